//! photovote-server: pairwise photo voting over HTTP
//!
//! Voters are shown two unseen photos from the same category at a time and
//! pick a winner. Each vote is recorded atomically; leaderboards and daily
//! maintenance jobs read the same Postgres schema.

pub mod db;
pub mod http;
pub mod models;
pub mod storage;
pub mod voting;

pub use db::{create_pool, create_pool_with_options};
pub use http::{run_server, ServerConfig};
