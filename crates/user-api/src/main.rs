//! User API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p user-api
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use tracing::{error, info};
use user_common::{try_init_tracing_with_config, AppConfig, TracingConfig};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Server failed to start: {e}");
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {}", e);
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        port = config.api.port,
        cache = ?config.cache.backend,
        "Configuration loaded"
    );

    user_api::run(config).await?;

    Ok(())
}
