//! # user-service
//!
//! Application layer containing the user use cases, the read-through
//! listing cache, and DTOs.

pub mod dto;
pub mod services;

pub use dto::{CreateUserRequest, ListUsersQuery, UserResponse};
pub use services::{
    Listing, ListingSource, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    UserListingCache, UserService,
};
