//! HTTP server command for the photovote API

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::Parser;
use photovote_server::db::migrations;
use photovote_server::http::{run_server, ServerConfig};

use super::maintenance::parse_timezone;
use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "PHOTOVOTE_BIND", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Directory uploaded images are stored in (served under /media)
    #[arg(long, env = "PHOTOVOTE_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Public base URL for image links (default: http://<bind>)
    #[arg(long, env = "PHOTOVOTE_PUBLIC_URL")]
    pub public_url: Option<String>,

    /// IANA timezone for maintenance dates
    #[arg(long, env = "PHOTOVOTE_TIMEZONE", default_value = "Asia/Barnaul", value_parser = parse_timezone)]
    pub timezone: Tz,

    /// Per-request timeout in seconds
    #[arg(long, env = "PHOTOVOTE_REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout: u64,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            request_timeout: Duration::from_secs(self.request_timeout),
            upload_dir: self.upload_dir.clone(),
            public_url: self
                .public_url
                .clone()
                .unwrap_or_else(|| format!("http://{}", self.bind)),
            timezone: self.timezone,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config();
    tracing::info!("Starting photovote server on {}", config.bind_addr);

    let pool = args.db.connect().await?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    // Run server (blocks until shutdown)
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
