// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`SessionStore`] trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use emipro_config::model::StorageConfig;
use emipro_core::{AdapterType, EmiproError, HealthStatus, PluginAdapter, SessionStore};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed session store.
///
/// The database file is opened lazily on first use, so constructing the store
/// never fails and a broken disk only surfaces when a value is written or read.
pub struct SqliteSessionStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteSessionStore {
    /// Create a store for the configured database path. Nothing is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already opened database.
    pub fn with_database(config: StorageConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::new_with(Some(db)),
        }
    }

    async fn db(&self) -> Result<&Database, EmiproError> {
        self.db
            .get_or_try_init(|| async {
                let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
                debug!(path = %self.config.database_path, "session store initialized");
                Ok::<_, EmiproError>(db)
            })
            .await
    }
}

#[async_trait]
impl PluginAdapter for SqliteSessionStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, EmiproError> {
        let db = self.db().await?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EmiproError> {
        if let Some(db) = self.db.get()
            && self.config.wal_mode
        {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), EmiproError> {
        queries::kv::put(self.db().await?, key, value).await
    }

    async fn take(&self, key: &str) -> Result<Option<String>, EmiproError> {
        queries::kv::take(self.db().await?, key).await
    }

    async fn remove(&self, key: &str) -> Result<(), EmiproError> {
        queries::kv::remove(self.db().await?, key).await
    }
}
