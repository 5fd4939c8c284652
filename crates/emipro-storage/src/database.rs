// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup and migrations.
//!
//! All statements run on tokio-rusqlite's single background thread.

use emipro_core::EmiproError;
use tracing::debug;

use crate::migrations;

/// Convert a tokio-rusqlite error into [`EmiproError::Storage`].
pub(crate) fn map_tr_err<E>(e: tokio_rusqlite::Error<E>) -> EmiproError
where
    E: std::error::Error + Send + Sync + 'static,
{
    EmiproError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the SQLite database file.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and migrates it.
    ///
    /// The parent directory is created when missing.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, EmiproError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(EmiproError::storage)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| EmiproError::Storage {
                source: Box::new(e),
            })?;

        let db = Self { conn };
        db.prepare(wal_mode).await?;
        debug!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Opens a private in-memory database, migrated and ready.
    pub async fn open_in_memory() -> Result<Self, EmiproError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| EmiproError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), EmiproError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                if wal_mode {
                    conn.pragma_update(None, "journal_mode", "WAL")?;
                }
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.pragma_update(None, "busy_timeout", 5000)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        self.conn
            .call(migrations::run_migrations)
            .await
            .map_err(map_tr_err)
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL so the main file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), EmiproError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/emipro.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        assert!(path.exists());
        db.checkpoint().await.unwrap();
    }

    #[tokio::test]
    async fn migrations_create_kv_table() {
        let db = Database::open_in_memory().await.unwrap();
        let count: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn reopening_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("emipro.db");
        let path = path.to_str().unwrap();
        drop(Database::open(path, true).await.unwrap());
        assert!(Database::open(path, true).await.is_ok());
    }
}
