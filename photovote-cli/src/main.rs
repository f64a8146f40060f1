//! photovote CLI - run the voting API and its housekeeping jobs
//!
//! Subcommands:
//! - `serve`: HTTP API (migrates the schema first)
//! - `migrate`: create tables and indexes, then exit
//! - `maintenance`: run a daily job once (`reset_activity` or `update_stats`)

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "photovote",
    author,
    version,
    about = "Pairwise photo voting service",
    long_about = "Serve the photo voting API backed by Postgres, bootstrap its schema, \
                  and run the daily activity reset and stats snapshot."
)]
struct Cli {
    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create or update the database schema
    Migrate(commands::migrate::MigrateArgs),
    /// Run a maintenance job for today's date
    Maintenance(commands::maintenance::MaintenanceArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
        Commands::Maintenance(args) => commands::run_maintenance(args).await?,
    }
    Ok(())
}
