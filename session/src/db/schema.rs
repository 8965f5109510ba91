use sqlx::SqlitePool;

use crate::error::Result;

/// Creates the `sessions` table and its expiry index if they do not exist.
///
/// `expiry` holds a fractional Julian day (UTC), so comparing it against
/// `julianday('now')` is a plain numeric comparison.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS sessions (
  token TEXT PRIMARY KEY,
  data BLOB NOT NULL,
  expiry REAL NOT NULL
);
"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(r#"CREATE INDEX IF NOT EXISTS sessions_expiry_idx ON sessions(expiry);"#)
        .execute(pool)
        .await?;

    Ok(())
}
