//! Command implementations for the photovote CLI

pub mod maintenance;
pub mod migrate;
pub mod serve;

use anyhow::{Context, Result};
use clap::Args;
use photovote_server::db::{create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
use sqlx::PgPool;

pub use maintenance::run_maintenance;
pub use migrate::run_migrate;
pub use serve::run_serve;

/// Database connection options shared by every subcommand
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Upper bound on pooled connections
    #[arg(long, env = "PHOTOVOTE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    pub async fn connect(&self) -> Result<PgPool> {
        let database_url = self
            .database_url
            .as_deref()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

        create_pool_with_options(database_url, self.max_connections)
            .await
            .context("Failed to create database pool")
    }
}
