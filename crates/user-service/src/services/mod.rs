//! Business logic services
//!
//! This module contains the service layer: the user use cases and the
//! read-through cache in front of the user listing.

pub mod context;
pub mod error;
pub mod listing;
pub mod user;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use listing::{Listing, ListingSource, UserListingCache};
pub use user::UserService;
