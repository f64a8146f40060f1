//! One-shot maintenance command, for cron or manual runs

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use clap::Parser;
use photovote_server::db::{local_date, MaintenanceRepo};
use photovote_server::models::MaintenanceAction;

use super::DatabaseArgs;

/// Arguments for the maintenance command
#[derive(Parser, Debug)]
pub struct MaintenanceArgs {
    /// Job to run: reset_activity or update_stats
    #[arg(default_value = "update_stats")]
    pub action: MaintenanceAction,

    /// IANA timezone deciding the current date
    #[arg(long, env = "PHOTOVOTE_TIMEZONE", default_value = "Asia/Barnaul", value_parser = parse_timezone)]
    pub timezone: Tz,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub(crate) fn parse_timezone(raw: &str) -> Result<Tz, String> {
    raw.parse::<Tz>().map_err(|e| e.to_string())
}

/// Run one job and print its report as JSON
pub async fn run_maintenance(args: MaintenanceArgs) -> Result<()> {
    let pool = args.db.connect().await?;
    let today = local_date(args.timezone, Utc::now());

    let report = MaintenanceRepo::new(&pool)
        .run(args.action, today)
        .await
        .with_context(|| format!("Maintenance job '{}' failed", args.action))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    pool.close().await;
    Ok(())
}
