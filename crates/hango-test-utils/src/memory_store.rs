// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory thread store with failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use hango_core::{AdapterType, HangoError, HealthStatus, PluginAdapter, ThreadRecord, ThreadStore};

/// A `ThreadStore` backed by a `HashMap`, with the same upsert semantics as
/// the SQLite store. Reads and writes can be made to fail on demand.
#[derive(Default)]
pub struct InMemoryThreadStore {
    records: Mutex<HashMap<String, ThreadRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Successful upserts so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Insert a record directly, bypassing failure injection.
    pub async fn seed(&self, record: ThreadRecord) {
        self.records
            .lock()
            .await
            .insert(record.thread_id.clone(), record);
    }

    pub async fn record(&self, thread_id: &str) -> Option<ThreadRecord> {
        self.records.lock().await.get(thread_id).cloned()
    }
}

fn injected(op: &str) -> HangoError {
    debug!(op, "in-memory store failing on request");
    HangoError::Storage {
        source: format!("injected {op} failure").into(),
    }
}

#[async_trait]
impl PluginAdapter for InMemoryThreadStore {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ThreadStore
    }

    async fn health_check(&self) -> Result<HealthStatus, HangoError> {
        if self.fail_reads.load(Ordering::SeqCst) || self.fail_writes.load(Ordering::SeqCst) {
            Ok(HealthStatus::Degraded("failure injection active".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), HangoError> {
        Ok(())
    }
}

#[async_trait]
impl ThreadStore for InMemoryThreadStore {
    async fn initialize(&self) -> Result<(), HangoError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), HangoError> {
        Ok(())
    }

    async fn get_thread_state(
        &self,
        thread_id: &str,
        user_id: &str,
    ) -> Result<Option<String>, HangoError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        Ok(self
            .records
            .lock()
            .await
            .get(thread_id)
            .filter(|r| r.user_id == user_id)
            .map(|r| r.encoded_state.clone()))
    }

    async fn upsert_thread_state(&self, record: &ThreadRecord) -> Result<(), HangoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }
        let mut records = self.records.lock().await;
        records
            .entry(record.thread_id.clone())
            .and_modify(|existing| {
                existing.encoded_state = record.encoded_state.clone();
                existing.message_count = record.message_count;
                existing.updated_at = record.updated_at.clone();
            })
            .or_insert_with(|| record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_thread_record(
        &self,
        thread_id: &str,
    ) -> Result<Option<ThreadRecord>, HangoError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        Ok(self.records.lock().await.get(thread_id).cloned())
    }
}
