//! Integration test support for the user service
//!
//! `memory` builds the full router over an in-memory store and cache so
//! the HTTP surface can be exercised without external services. `helpers`
//! drives a real server over TCP for the tests that need Postgres and Redis.

pub mod fixtures;
pub mod helpers;
pub mod memory;

pub use fixtures::*;
pub use helpers::*;
pub use memory::*;
