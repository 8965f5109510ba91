pub mod schema;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

use crate::config::StoreConfig;
use crate::error::Result;

/// Opens the connection pool described by `cfg`.
///
/// The database file is created if missing and switched to WAL so readers are
/// not blocked by the single writer. Each connection waits up to five seconds
/// on a locked database before reporting an error.
pub async fn connect(cfg: &StoreConfig) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&cfg.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(cfg.acquire_timeout)
        .connect_with(opts)
        .await?;

    info!(
        max_connections = cfg.max_connections,
        "session database pool opened"
    );

    Ok(pool)
}
