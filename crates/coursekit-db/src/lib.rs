//! # Coursekit DB
//!
//! PostgreSQL connection pool initialization.
//!
//! ```ignore
//! use coursekit_db::init_db_pool;
//!
//! let pool = init_db_pool().await?;
//! ```

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::time::Duration;

pub use sqlx::PgPool;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connects to the database named by `DATABASE_URL`.
///
/// `DATABASE_MAX_CONNECTIONS` overrides the pool size (default 10).
///
/// # Errors
///
/// Fails when `DATABASE_URL` is unset or the first connection cannot be
/// established.
pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(max_connections, "database pool ready");
    Ok(pool)
}
