//! Database layer - connection pool, schema bootstrap, repositories
//!
//! - Connection pool, no shared connections between requests
//! - Set-based statements, no N+1 loops
//! - Rely on DB constraints (ON CONFLICT), no check-then-insert
//! - Transactions for multi-step writes

pub mod migrations;
pub mod pool;
pub mod repos;

#[cfg(test)]
pub(crate) mod test_support;

pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
