//! Domain entities - core business objects

mod user;

pub use user::{NewUser, UnknownVariant, User, UserRole, UserStatus, UserSummary};
