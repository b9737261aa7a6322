//! CLI module for the site API
//!
//! Provides subcommands:
//! - `serve`: apply pending migrations, then run the API server
//! - `migrate`: apply pending migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Personal site API - public endpoints plus audited admin endpoints
#[derive(Parser)]
#[command(name = "site-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server (default)
    Serve,

    /// Apply database migrations and exit
    Migrate,
}

/// Load `.env`, read and check configuration, and start logging
fn init(command: &str) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging())?;
    config.check()?;

    tracing::debug!(command, "Configuration loaded");

    Ok(config)
}
