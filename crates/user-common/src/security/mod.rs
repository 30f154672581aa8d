//! Credential handling

mod password;

pub use password::{hash_password, hash_password_blocking, verify_password};
