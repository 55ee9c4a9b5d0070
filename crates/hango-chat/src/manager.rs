// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn processing: load state, reply, append, compact, persist.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use hango_config::MemoryConfig;
use hango_core::{CompletionGateway, HangoError, Persona, ThreadRecord, ThreadStore};
use tracing::{debug, error, info, warn};

use crate::codec::{self, ConversationState};
use crate::compaction;
use crate::locks::ThreadLocks;
use crate::prompt::{self, FALLBACK_REPLY};

/// One inbound user message.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub thread_id: String,
    pub user_id: String,
    pub persona: Persona,
    pub message: String,
    /// Caller-reported cumulative message count, stored unverified.
    pub message_count: Option<i64>,
}

/// A recovered failure. The turn still produced a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Stored state could not be read; the turn ran with empty memory.
    HistoryUnavailable { reason: String },
    /// Summarization failed; the oversized state was kept.
    CompactionFailed { reason: String },
    /// The new state could not be written.
    PersistFailed { reason: String },
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    /// RFC 3339 UTC, millisecond precision.
    pub timestamp: String,
    pub compacted: bool,
    pub degradations: Vec<Degradation>,
}

impl TurnOutcome {
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

/// Owns the memory lifecycle of every thread.
pub struct MemoryManager {
    store: Arc<dyn ThreadStore>,
    gateway: Arc<dyn CompletionGateway>,
    config: MemoryConfig,
    chat_model: String,
    locks: ThreadLocks,
}

impl MemoryManager {
    pub fn new(
        store: Arc<dyn ThreadStore>,
        gateway: Arc<dyn CompletionGateway>,
        config: &MemoryConfig,
        chat_model: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            config: config.clone(),
            chat_model: chat_model.into(),
            locks: ThreadLocks::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn ThreadStore> {
        &self.store
    }

    pub fn gateway(&self) -> &Arc<dyn CompletionGateway> {
        &self.gateway
    }

    pub fn locks(&self) -> &ThreadLocks {
        &self.locks
    }

    /// Current decoded state of a thread, for inspection.
    pub async fn load_state(
        &self,
        thread_id: &str,
        user_id: &str,
    ) -> Result<ConversationState, HangoError> {
        let raw = self.store.get_thread_state(thread_id, user_id).await?;
        Ok(codec::decode(raw.as_deref()))
    }

    /// Runs one turn.
    ///
    /// Only invalid input and a failed reply call are errors, and neither
    /// touches stored state. Storage and summarization failures are reported
    /// as [`Degradation`]s on an otherwise successful outcome.
    pub async fn process_turn(&self, request: TurnRequest) -> Result<TurnOutcome, HangoError> {
        validate(&request)?;

        let _guard = if self.config.serialize_threads {
            Some(self.locks.acquire(&request.thread_id).await)
        } else {
            None
        };

        let mut degradations = Vec::new();
        let state = match self
            .store
            .get_thread_state(&request.thread_id, &request.user_id)
            .await
        {
            Ok(raw) => codec::decode(raw.as_deref()),
            Err(e) => {
                warn!(thread_id = %request.thread_id, error = %e, "history unavailable, continuing with empty memory");
                degradations.push(Degradation::HistoryUnavailable {
                    reason: e.to_string(),
                });
                ConversationState::default()
            }
        };

        let threshold = self.config.compaction_threshold_chars;
        debug!(
            thread_id = %request.thread_id,
            persona = %request.persona,
            phase = %state.phase(threshold),
            summary_chars = state.summary.chars().count(),
            recent_chars = state.recent.chars().count(),
            "conversation state loaded"
        );

        let reply_request = prompt::build_reply_request(
            request.persona,
            &state,
            &request.message,
            &self.chat_model,
            &self.config,
        );
        let response = self.gateway.complete(reply_request).await.map_err(|e| {
            error!(thread_id = %request.thread_id, error = %e, "reply generation failed");
            e
        })?;

        let reply = if response.content.is_empty() {
            FALLBACK_REPLY.to_string()
        } else {
            response.content
        };

        let mut next = state;
        next.append_turn(&request.message, &reply);

        let mut compacted = false;
        if compaction::needs_compaction(&next, threshold) {
            info!(
                thread_id = %request.thread_id,
                total_chars = next.total_len(),
                threshold,
                "conversation over threshold, compacting"
            );
            match compaction::compact(self.gateway.as_ref(), &next, &self.chat_model, &self.config)
                .await
            {
                Ok(summarized) => {
                    next = summarized;
                    compacted = true;
                }
                Err(e) => {
                    warn!(thread_id = %request.thread_id, error = %e, "compaction failed, keeping oversized state");
                    degradations.push(Degradation::CompactionFailed {
                        reason: e.to_string(),
                    });
                }
            }
        }

        let timestamp = now_timestamp();
        let record = ThreadRecord {
            thread_id: request.thread_id.clone(),
            user_id: request.user_id.clone(),
            persona_id: request.persona.id(),
            encoded_state: codec::encode(&next),
            message_count: request.message_count.unwrap_or(0),
            updated_at: timestamp.clone(),
        };
        match self.store.upsert_thread_state(&record).await {
            Ok(()) => info!(
                thread_id = %request.thread_id,
                encoded_chars = record.encoded_state.chars().count(),
                phase = %next.phase(threshold),
                "conversation state persisted"
            ),
            Err(e) => {
                warn!(thread_id = %request.thread_id, error = %e, "failed to persist conversation state");
                degradations.push(Degradation::PersistFailed {
                    reason: e.to_string(),
                });
            }
        }

        Ok(TurnOutcome {
            reply,
            timestamp,
            compacted,
            degradations,
        })
    }
}

fn validate(request: &TurnRequest) -> Result<(), HangoError> {
    let mut missing = Vec::new();
    if request.thread_id.trim().is_empty() {
        missing.push("thread_id");
    }
    if request.user_id.trim().is_empty() {
        missing.push("user_id");
    }
    if request.message.trim().is_empty() {
        missing.push("message");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(HangoError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Current UTC time as RFC 3339 with millisecond precision and a `Z` suffix.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
