//! Axum extractors for request handling
//!
//! Custom extractors for validation, path parameters, and pagination.

mod pagination;
mod path;
mod validated;

pub use pagination::Pagination;
pub use path::{ApiPath, UserIdPath};
pub use validated::ValidatedJson;
