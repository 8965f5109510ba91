//! SqliteStore
//! -----------
//! SQLite-backed implementation of [`SessionStore`].
//!
//! Every operation checks a connection out of the shared pool, runs exactly
//! one statement and hands the connection back when the guard drops, on the
//! error path too. "Now" is always `julianday('now')` inside the statement,
//! so one statement sees one consistent clock across all rows and reads never
//! race the sweep over an application-side timestamp.
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::{debug, instrument};

use super::SessionStore;
use super::expiry::julian_input;
use crate::cleanup::CleanupTask;
use crate::config::{DEFAULT_CLEANUP_INTERVAL, StoreConfig};
use crate::db;
use crate::error::Result;

/// Session store over a `sessions(token, data, expiry)` table.
///
/// Owns at most one background sweep. The sweep stops on
/// [`SqliteStore::stop_cleanup`] or when the store is dropped, and cannot be
/// restarted; build a new store for that.
pub struct SqliteStore {
    pool: SqlitePool,
    cleanup: Option<CleanupTask>,
}

impl SqliteStore {
    /// Store with the default five-minute expiry sweep.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_cleanup_interval(pool, DEFAULT_CLEANUP_INTERVAL)
    }

    /// Store with a custom sweep period. `Duration::ZERO` starts no sweep at
    /// all: expired rows then stay on disk but are still never returned.
    /// Periods longer than a year are clamped to a year.
    ///
    /// A non-zero interval must be used from within a Tokio runtime.
    pub fn with_cleanup_interval(pool: SqlitePool, cleanup_interval: Duration) -> Self {
        let cleanup = CleanupTask::spawn(pool.clone(), cleanup_interval);
        if cleanup.is_none() {
            debug!("session cleanup disabled");
        }

        Self { pool, cleanup }
    }

    /// Opens the pool described by `cfg`, creates the table if needed and
    /// starts the sweep at the configured interval.
    pub async fn from_config(cfg: &StoreConfig) -> Result<Self> {
        cfg.validate()?;

        let pool = db::connect(cfg).await?;
        db::schema::ensure_schema(&pool).await?;

        Ok(Self::with_cleanup_interval(pool, cfg.cleanup_interval))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Asks the background sweep to exit.
    ///
    /// Idempotent and non-blocking: calling it without a sweep, after the
    /// sweep already exited, or repeatedly is a no-op.
    pub fn stop_cleanup(&self) {
        if let Some(task) = &self.cleanup {
            task.stop();
        }
    }

    /// True while a sweep task exists and has not exited yet.
    pub fn cleanup_running(&self) -> bool {
        self.cleanup.as_ref().is_some_and(|task| !task.is_finished())
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn find(&self, token: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.pool.acquire().await?;

        let data: Option<Vec<u8>> = sqlx::query_scalar(
            "SELECT data FROM sessions WHERE token = ? AND julianday('now') < expiry",
        )
        .bind(token)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(data)
    }

    async fn commit(&self, token: &str, data: &[u8], expiry: DateTime<Utc>) -> Result<()> {
        let expiry = julian_input(&expiry)?;

        let mut conn = self.pool.acquire().await?;

        sqlx::query(
            r#"
INSERT INTO sessions (token, data, expiry)
VALUES (?, ?, julianday(?))
ON CONFLICT(token) DO UPDATE SET
  data = excluded.data,
  expiry = excluded.expiry;
"#,
        )
        .bind(token)
        .bind(data)
        .bind(&expiry)
        .execute(&mut *conn)
        .await?;

        debug!(token_len = token.len(), bytes = data.len(), %expiry, "session committed");
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    async fn all(&self) -> Result<HashMap<String, Vec<u8>>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query("SELECT token, data FROM sessions WHERE julianday('now') < expiry")
            .fetch_all(&mut *conn)
            .await?;

        let mut sessions = HashMap::with_capacity(rows.len());
        for row in rows {
            let token: String = row.try_get("token")?;
            let data: Vec<u8> = row.try_get("data")?;
            sessions.insert(token, data);
        }

        debug!(active = sessions.len(), "listed active sessions");
        Ok(sessions)
    }
}

/// Physically removes every expired row and returns how many went.
pub(crate) async fn delete_expired(pool: &SqlitePool) -> Result<u64> {
    let mut conn = pool.acquire().await?;

    let done = sqlx::query("DELETE FROM sessions WHERE expiry < julianday('now')")
        .execute(&mut *conn)
        .await?;

    Ok(done.rows_affected())
}
