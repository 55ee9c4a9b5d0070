// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread store trait for conversation state persistence backends.

use async_trait::async_trait;

use crate::error::HangoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ThreadRecord;

/// Persistence of one encoded conversation state per thread id.
#[async_trait]
pub trait ThreadStore: PluginAdapter {
    /// Initializes the backend (connection, migrations).
    async fn initialize(&self) -> Result<(), HangoError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), HangoError>;

    /// Returns the encoded state for a thread owned by `user_id`.
    ///
    /// `Ok(None)` means the thread has no state yet.
    async fn get_thread_state(
        &self,
        thread_id: &str,
        user_id: &str,
    ) -> Result<Option<String>, HangoError>;

    /// Inserts a record, or on thread-id conflict overwrites the encoded
    /// state, message count and `updated_at` while keeping the user and
    /// persona of the original insert.
    async fn upsert_thread_state(&self, record: &ThreadRecord) -> Result<(), HangoError>;

    /// Returns the full record for a thread regardless of owner.
    async fn get_thread_record(&self, thread_id: &str)
    -> Result<Option<ThreadRecord>, HangoError>;
}
