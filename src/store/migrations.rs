//! Schema setup for the libSQL backend.
//!
//! The applied schema version lives in a one-row `schema_version` table.
//! Opening a store brings the file up to `SCHEMA_VERSION` by running each
//! missing step in order.

use libsql::{Connection, params};

use crate::error::StoreError;

/// Version reached after every step in `STEPS` has run.
pub const SCHEMA_VERSION: i64 = 1;

/// Schema steps; index `i` upgrades version `i` to `i + 1`.
const STEPS: &[&str] = &["CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );"];

/// Bring the database up to `SCHEMA_VERSION`.
pub async fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 0),
            version INTEGER NOT NULL
        )",
        (),
    )
    .await
    .map_err(|e| StoreError::Migration(format!("schema_version table: {e}")))?;

    let from = schema_version(conn).await?;
    for (version, sql) in (1_i64..).zip(STEPS).skip(from as usize) {
        tracing::info!(version, "Upgrading store schema");
        conn.execute_batch(sql)
            .await
            .map_err(|e| StoreError::Migration(format!("step to v{version}: {e}")))?;
        conn.execute(
            "INSERT INTO schema_version (id, version) VALUES (0, ?1)
             ON CONFLICT(id) DO UPDATE SET version = excluded.version",
            params![version],
        )
        .await
        .map_err(|e| StoreError::Migration(format!("recording v{version}: {e}")))?;
    }

    Ok(())
}

/// Applied schema version, 0 for a fresh database.
pub async fn schema_version(conn: &Connection) -> Result<i64, StoreError> {
    let mut rows = conn
        .query("SELECT version FROM schema_version WHERE id = 0", ())
        .await
        .map_err(|e| StoreError::Migration(format!("reading schema version: {e}")))?;

    match rows
        .next()
        .await
        .map_err(|e| StoreError::Migration(format!("reading schema version: {e}")))?
    {
        Some(row) => row
            .get::<i64>(0)
            .map_err(|e| StoreError::Migration(format!("decoding schema version: {e}"))),
        None => Ok(0),
    }
}
