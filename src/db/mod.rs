mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable key/value mirror of the tracker state.
///
/// Values are opaque text blobs (JSON or plain strings). Implementations are
/// expected to be synchronous; a failed write must leave earlier values readable.
pub(crate) trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Write several keys together. The default writes them one by one.
    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }
}

impl BlobStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read key '{key}'"))?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, chrono::Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to write key '{key}'"))?;
        tracing::debug!(key, bytes = value.len(), "blob written");
        Ok(())
    }

    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .with_context(|| format!("Failed to write key '{key}'"))?;
        }
        tx.commit()?;
        tracing::debug!(count = entries.len(), "blobs written");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
