//! SQLite-backed persistence for opaque session blobs.
//!
//! [`SqliteStore`] keeps one row per session token in a `sessions` table and
//! implements the [`SessionStore`] contract used by session middleware:
//! find, commit (upsert), delete and list-all. Expiry is evaluated by SQLite
//! itself, so expired rows vanish from reads immediately while a background
//! sweep removes them from disk on a fixed interval.

mod cleanup;
pub mod config;
pub mod db;
pub mod error;
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use store::SessionStore;
pub use store::sqlite_store::SqliteStore;
