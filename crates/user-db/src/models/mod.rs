//! Database models - SQLx-compatible structs for the users table

mod user;

pub use user::{UserModel, UserSummaryModel};
