use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures surfaced by the session store.
///
/// A missing or expired session is not an error; lookups report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Acquiring a pooled connection or executing a statement failed.
    #[error("session storage failed: {0}")]
    Storage(#[from] sqlx::Error),

    /// The expiry cannot be expressed as a SQLite Julian day.
    #[error("expiry {0} is outside the supported range (years 0000-9999)")]
    InvalidExpiry(DateTime<Utc>),

    #[error("invalid configuration value {value:?} for {key}")]
    Config { key: &'static str, value: String },
}

impl StoreError {
    /// True when no connection could be checked out (pool timed out or closed).
    pub fn is_pool_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::Storage(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed)
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
