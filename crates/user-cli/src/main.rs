//! User service CLI - migrations, bulk seeding and cache maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Apply the schema
//! user-cli migrate
//!
//! # Insert 500k generated users in chunks of 10k
//! user-cli seed --total 500000 --chunk 10000
//!
//! # Replace every password hash, 64 updates in flight per chunk
//! user-cli reset-passwords --chunk 5000 --concurrency 64
//!
//! # Cache maintenance
//! user-cli flush-cache
//! user-cli cache-stats
//! ```
//!
//! Configuration comes from the same environment variables as the server.

use clap::{Parser, Subcommand};
use user_common::{try_init_tracing_with_config, AppConfig, TracingConfig};

mod commands;
mod error;
mod fake;

use error::CliError;

#[derive(Parser)]
#[command(name = "user-cli")]
#[command(author, version, about = "User service management tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert generated users, skipping emails that already exist
    Seed {
        /// Number of users to generate
        #[arg(long, default_value_t = 500_000)]
        total: u64,

        /// Users inserted per statement
        #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
        chunk: u64,
    },
    /// Replace the password hash of every user
    ResetPasswords {
        /// Users loaded per chunk
        #[arg(long, default_value_t = 5_000, value_parser = clap::value_parser!(u64).range(1..))]
        chunk: u64,

        /// Updates in flight within a chunk
        #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u64).range(1..))]
        concurrency: u64,

        /// Hash this password instead of writing the reset marker
        #[arg(long)]
        password: Option<String>,
    },
    /// Remove every key from the cache
    FlushCache,
    /// Print cache server statistics as JSON
    CacheStats,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Command failed: {e}");
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::from_env()?;
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    match cli.command {
        Commands::Migrate => commands::migrate::run(&config).await,
        Commands::Seed { total, chunk } => commands::seed::run(&config, total, chunk).await,
        Commands::ResetPasswords {
            chunk,
            concurrency,
            password,
        } => commands::passwords::run(&config, chunk, concurrency as usize, password).await,
        Commands::FlushCache => commands::cache::flush(&config).await,
        Commands::CacheStats => commands::cache::stats(&config).await,
    }
}
