// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the memory manager and translator over a temp
//! SQLite thread store and a [`MockGateway`], the same wiring `hango serve`
//! uses with the real OpenAI gateway.

use std::sync::Arc;
use std::time::Duration;

use hango_chat::{ConversationState, MemoryManager, Translator, TurnOutcome, TurnRequest};
use hango_config::model::{HangoConfig, MemoryConfig, StorageConfig};
use hango_core::{HangoError, Persona, ThreadStore};
use hango_storage::SqliteThreadStore;

use crate::mock_gateway::{MockGateway, MockReply};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    replies: Vec<MockReply>,
    memory: MemoryConfig,
    gateway_delay: Option<Duration>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            memory: MemoryConfig::default(),
            gateway_delay: None,
        }
    }

    /// Script the mock gateway.
    pub fn with_replies(mut self, replies: Vec<MockReply>) -> Self {
        self.replies = replies;
        self
    }

    pub fn with_memory_config(mut self, memory: MemoryConfig) -> Self {
        self.memory = memory;
        self
    }

    /// Shortcut for overriding only the compaction threshold.
    pub fn with_threshold(mut self, chars: usize) -> Self {
        self.memory.compaction_threshold_chars = chars;
        self.memory.summary_target_chars = self.memory.summary_target_chars.min(chars / 2);
        self
    }

    /// Make every gateway call take at least this long.
    pub fn with_gateway_delay(mut self, delay: Duration) -> Self {
        self.gateway_delay = Some(delay);
        self
    }

    pub async fn build(self) -> Result<TestHarness, HangoError> {
        let temp_dir = tempfile::TempDir::new().map_err(HangoError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = HangoConfig::default();
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };
        config.memory = self.memory;

        let store = Arc::new(SqliteThreadStore::new(config.storage.clone()));
        store.initialize().await?;

        let mut gateway = MockGateway::with_replies(self.replies);
        if let Some(delay) = self.gateway_delay {
            gateway = gateway.with_delay(delay);
        }
        let gateway = Arc::new(gateway);

        let manager = Arc::new(MemoryManager::new(
            store.clone(),
            gateway.clone(),
            &config.memory,
            config.openai.chat_model.clone(),
        ));
        let translator = Arc::new(Translator::new(
            gateway.clone(),
            config.openai.translation_model.clone(),
        ));

        Ok(TestHarness {
            gateway,
            store,
            manager,
            translator,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock gateway and temp storage.
pub struct TestHarness {
    /// The scripted completion gateway.
    pub gateway: Arc<MockGateway>,
    /// SQLite thread store (temp DB, removed on drop).
    pub store: Arc<SqliteThreadStore>,
    pub manager: Arc<MemoryManager>,
    pub translator: Arc<Translator>,
    pub config: HangoConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Run one turn as `user` on `thread` with the default companion.
    pub async fn send(
        &self,
        thread: &str,
        user: &str,
        message: &str,
    ) -> Result<TurnOutcome, HangoError> {
        self.manager
            .process_turn(TurnRequest {
                thread_id: thread.to_string(),
                user_id: user.to_string(),
                persona: Persona::AiFriend,
                message: message.to_string(),
                message_count: None,
            })
            .await
    }

    /// Raw persisted string for a thread.
    pub async fn stored_raw(&self, thread: &str, user: &str) -> Result<Option<String>, HangoError> {
        self.store.get_thread_state(thread, user).await
    }

    pub async fn stored_state(
        &self,
        thread: &str,
        user: &str,
    ) -> Result<ConversationState, HangoError> {
        self.manager.load_state(thread, user).await
    }

    /// Seed a thread with a state, as if earlier turns had been stored.
    pub async fn seed(
        &self,
        thread: &str,
        user: &str,
        state: &ConversationState,
    ) -> Result<(), HangoError> {
        self.store
            .upsert_thread_state(&hango_core::ThreadRecord {
                thread_id: thread.to_string(),
                user_id: user.to_string(),
                persona_id: Persona::AiFriend.id(),
                encoded_state: hango_chat::encode(state),
                message_count: 0,
                updated_at: hango_chat::now_timestamp(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_creates_working_environment() {
        let harness = TestHarness::builder().build().await.unwrap();
        assert!(harness.stored_raw("none", "nobody").await.unwrap().is_none());
        assert_eq!(harness.store.thread_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn send_persists_through_sqlite() {
        let harness = TestHarness::builder()
            .with_replies(vec![MockReply::text("Hello")])
            .build()
            .await
            .unwrap();

        let outcome = harness.send("chat-1", "user-1", "Hi").await.unwrap();
        assert_eq!(outcome.reply, "Hello");
        assert_eq!(
            harness.stored_raw("chat-1", "user-1").await.unwrap().as_deref(),
            Some("__SUMMARY____RECENT__Human: Hi\nAI: Hello")
        );
    }

    #[tokio::test]
    async fn threshold_shortcut_keeps_config_valid() {
        let harness = TestHarness::builder().with_threshold(100).build().await.unwrap();
        assert_eq!(harness.config.memory.compaction_threshold_chars, 100);
        assert!(harness.config.memory.summary_target_chars < 100);
    }
}
