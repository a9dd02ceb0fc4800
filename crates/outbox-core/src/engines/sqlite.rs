//! SQLite-backed key-value engine.
//!
//! One table, one row per persistence key. Every operation is a single
//! statement, which gives per-key atomicity without explicit transactions.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::{ErrorCode, OutboxError, OutboxResult};
use crate::traits::KvEngine;
use crate::types::OutboxKey;

/// SQLite key-value engine.
pub struct SqliteEngine {
    conn: Mutex<Connection>,
}

impl SqliteEngine {
    /// Open (or create) the database at `path`.
    pub fn new(path: impl AsRef<Path>) -> OutboxResult<Self> {
        let conn = Connection::open(path.as_ref()).map_err(|e| OutboxError::Database {
            message: format!(
                "Failed to open outbox database at {}: {}",
                path.as_ref().display(),
                e
            ),
            code: ErrorCode::DbConnectionFailed,
            source: Some(Box::new(e)),
        })?;
        let engine = Self {
            conn: Mutex::new(conn),
        };
        engine.init_schema()?;
        Ok(engine)
    }

    /// Create an in-memory engine (for testing)
    pub fn in_memory() -> OutboxResult<Self> {
        let conn = Connection::open_in_memory()?;
        let engine = Self {
            conn: Mutex::new(conn),
        };
        engine.init_schema()?;
        Ok(engine)
    }

    fn init_schema(&self) -> OutboxResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS outbox_entries (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> OutboxResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| OutboxError::database(e.to_string()))
    }

    /// Number of stored keys.
    pub fn count_all(&self) -> OutboxResult<usize> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM outbox_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl KvEngine for SqliteEngine {
    async fn get(&self, key: &OutboxKey) -> OutboxResult<Option<Vec<u8>>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM outbox_entries WHERE key = ?1",
                params![key.as_str()],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn put(&self, key: &OutboxKey, value: &[u8]) -> OutboxResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"INSERT INTO outbox_entries (key, value, updated_at)
               VALUES (?1, ?2, ?3)
               ON CONFLICT(key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = excluded.updated_at"#,
            params![key.as_str(), value, Utc::now().to_rfc3339()],
        )?;
        tracing::debug!(key = %key, bytes = value.len(), "Stored outbox entry");
        Ok(())
    }

    async fn delete(&self, key: &OutboxKey) -> OutboxResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM outbox_entries WHERE key = ?1",
            params![key.as_str()],
        )?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
