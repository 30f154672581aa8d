//! # user-core
//!
//! Domain layer containing the user entity, its projections, value objects and
//! the repository trait. This crate has zero dependencies on infrastructure
//! (database, cache, web framework).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export commonly used types at crate root
pub use entities::{NewUser, UnknownVariant, User, UserRole, UserStatus, UserSummary};
pub use error::DomainError;
pub use traits::{RepoResult, UserRepository};
pub use value_objects::{UserId, UserIdParseError};
