//! # user-db
//!
//! Database layer implementing the user repository trait with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use user_db::pool::{create_pool, DatabaseConfig};
//! use user_db::repositories::PgUserRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     let user_repo = PgUserRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, EmbeddedMigrations, PgPool};
pub use repositories::PgUserRepository;
