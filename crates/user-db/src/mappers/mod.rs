//! Entity to model mappers
//!
//! Conversions between domain entities (user-core) and database models.
//! - `TryFrom<Model> for Entity`: convert database rows to domain objects
//! - `UserBatch`: column-wise arrays for bulk inserts

mod user;

pub use user::UserBatch;
