//! Command-line entry points
//!
//! - `serve`: run the HTTP API
//! - `migrate`: apply, revert or inspect database migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Fitness tracker API server
#[derive(Parser)]
#[command(name = "fitness-tracker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Manage the PostgreSQL schema
    #[command(subcommand)]
    Migrate(migrate::MigrateCommand),
}

/// Loads `.env` and layered configuration, then installs the subscriber
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;
    config.validate()?;

    Ok(config)
}

