//! Pokedex dashboard server binary.
//!
//! Loads configuration, prepares the species store and serves the
//! dashboard API until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `pokedex-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Connect to `SQLite`, creating the database file and its directory
//! 4. Run migrations
//! 5. Seed the store from the JSON dataset if it is empty
//! 6. Serve the HTTP API
//! 7. Close the pool on shutdown

mod config;
mod error;

use std::path::Path;
use std::sync::Arc;

use pokedex_api::AppState;
use pokedex_db::{DbPool, SeedOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{CONFIG_FILE, ConfigSource, LogFormat, LoggingSettings, PokedexConfig};
use crate::error::AppError;

/// Application entry point for the Pokedex server.
///
/// # Errors
///
/// Returns an error if configuration, database bootstrap or the server
/// fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration. Logging depends on it, so it comes first.
    let (config, source) = PokedexConfig::load(Path::new(CONFIG_FILE))?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);

    info!("pokedex-server starting");
    match source {
        ConfigSource::File => info!(path = CONFIG_FILE, "Configuration loaded"),
        ConfigSource::Defaults => info!("Config file not found, using defaults"),
    }
    info!(
        host = %config.server.host,
        port = config.server.port,
        database_url = %config.database.url,
        seed_path = %config.database.seed_path.display(),
        "Effective configuration"
    );

    // 3-4. Connect and migrate.
    let db = DbPool::connect(&config.database.sqlite_config()).await?;
    db.run_migrations().await?;

    // 5. Seed if empty.
    let outcome = pokedex_db::seed_if_empty(db.pool(), &config.database.seed_path).await?;
    match outcome {
        SeedOutcome::Seeded { count } => info!(count, "Species store seeded"),
        SeedOutcome::AlreadySeeded { existing } => info!(existing, "Species store ready"),
        SeedOutcome::FileMissing | SeedOutcome::EmptyDataset => {
            tracing::warn!(?outcome, "Species store is empty, serving no species");
        }
    }

    // 6. Serve until Ctrl-C.
    let state = Arc::new(AppState::new(db.clone()));
    pokedex_api::start_server(&config.server.server_config(), state).await?;

    // 7. Shut down.
    db.close().await;
    info!("pokedex-server shutdown complete");

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set.
fn init_tracing(logging: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init(),
    }
}
