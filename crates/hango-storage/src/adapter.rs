// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`ThreadStore`] trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use hango_config::model::StorageConfig;
use hango_core::{AdapterType, HangoError, HealthStatus, PluginAdapter, ThreadRecord, ThreadStore};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed thread store.
///
/// The database is opened by [`ThreadStore::initialize`]; every other call
/// fails with a storage error until then.
pub struct SqliteThreadStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteThreadStore {
    /// Create a store for the configured path. Nothing is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, HangoError> {
        self.db.get().ok_or_else(|| HangoError::Storage {
            source: "thread store not initialized -- call initialize() first".into(),
        })
    }

    /// Number of stored threads.
    pub async fn thread_count(&self) -> Result<i64, HangoError> {
        queries::thread_states::count_threads(self.db()?).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteThreadStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ThreadStore
    }

    async fn health_check(&self) -> Result<HealthStatus, HangoError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err);
        Ok(match probe {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), HangoError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl ThreadStore for SqliteThreadStore {
    async fn initialize(&self) -> Result<(), HangoError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| HangoError::Storage {
            source: "thread store already initialized".into(),
        })?;
        info!(path = %self.config.database_path, "SQLite thread store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), HangoError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn get_thread_state(
        &self,
        thread_id: &str,
        user_id: &str,
    ) -> Result<Option<String>, HangoError> {
        queries::thread_states::get_thread_state(self.db()?, thread_id, user_id).await
    }

    async fn upsert_thread_state(&self, record: &ThreadRecord) -> Result<(), HangoError> {
        queries::thread_states::upsert_thread_state(self.db()?, record).await
    }

    async fn get_thread_record(
        &self,
        thread_id: &str,
    ) -> Result<Option<ThreadRecord>, HangoError> {
        queries::thread_states::get_thread_record(self.db()?, thread_id).await
    }
}
