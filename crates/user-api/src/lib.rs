//! # user-api
//!
//! REST API server built with Axum framework.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use response::{ApiError, ApiResult};
pub use server::{build_cache, create_app, create_app_state, run, run_server};
pub use state::AppState;
