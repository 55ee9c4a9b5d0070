// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation memory for the HanGo chat backend.
//!
//! Each thread keeps a two-tier memory: a rolling summary plus the literal
//! recent transcript. [`MemoryManager`] appends every turn to the transcript
//! and, once the two together exceed the configured character budget, asks
//! the completion gateway to fold them into a new summary. The state is
//! persisted as one sentinel-delimited string per thread (see [`codec`]).

pub mod codec;
pub mod compaction;
pub mod locks;
pub mod manager;
pub mod prompt;
pub mod translate;

pub use codec::{ConversationState, MemoryPhase, decode, encode};
pub use locks::{ThreadGuard, ThreadLocks};
pub use manager::{Degradation, MemoryManager, TurnOutcome, TurnRequest, now_timestamp};
pub use prompt::FALLBACK_REPLY;
pub use translate::{TranslateRequest, Translation, Translator};
