//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use user_core::User;

use super::responses::UserResponse;

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            avatar: user.avatar.clone(),
            address: user.address.clone(),
            bio: user.bio.clone(),
            role: user.role,
            status: user.status,
            is_email_verified: user.is_email_verified,
            birthdate: user.birthdate,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}
