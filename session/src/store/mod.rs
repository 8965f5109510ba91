pub mod expiry;
pub mod sqlite_store;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Storage contract consumed by session middleware.
///
/// Payloads are opaque bytes. A session whose expiry has passed behaves
/// exactly like one that never existed.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the payload of the active session for `token`, or `None` when
    /// there is no such session or it has expired.
    async fn find(&self, token: &str) -> Result<Option<Vec<u8>>>;

    /// Inserts the session, or replaces its payload and expiry if `token`
    /// already exists.
    async fn commit(&self, token: &str, data: &[u8], expiry: DateTime<Utc>) -> Result<()>;

    /// Removes the session for `token`. Removing an unknown token succeeds.
    async fn delete(&self, token: &str) -> Result<()>;

    /// Returns every active session keyed by token.
    async fn all(&self) -> Result<HashMap<String, Vec<u8>>>;
}
