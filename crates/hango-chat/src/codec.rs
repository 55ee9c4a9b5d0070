// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-segment conversation state and its persisted string form.
//!
//! A state is stored as `__SUMMARY__<summary>__RECENT__<recent>`. Rows written
//! before segmentation existed carry no summary sentinel and decode as a bare
//! recent log. The format is not escaped: a summary containing
//! [`RECENT_SENTINEL`] does not survive a round trip, so summaries are passed
//! through [`scrub_sentinels`] before they enter a state.

use strum::Display;

pub const SUMMARY_SENTINEL: &str = "__SUMMARY__";
pub const RECENT_SENTINEL: &str = "__RECENT__";

/// Rolling summary plus the literal transcript since the last compaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub summary: String,
    pub recent: String,
}

impl ConversationState {
    pub fn new(summary: impl Into<String>, recent: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            recent: recent.into(),
        }
    }

    /// Combined length in characters (Unicode scalar values).
    pub fn total_len(&self) -> usize {
        self.summary.chars().count() + self.recent.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.recent.is_empty()
    }

    /// Whether [`decode`] of [`encode`] gives this state back.
    ///
    /// The recent sentinel must first appear where [`encode`] puts it, which
    /// also rules out a summary that completes a sentinel across its edges
    /// (`"RECENT__x"` right after `__SUMMARY__`).
    pub fn is_encodable(&self) -> bool {
        let framed = format!("{SUMMARY_SENTINEL}{}{RECENT_SENTINEL}", self.summary);
        framed.find(RECENT_SENTINEL) == Some(SUMMARY_SENTINEL.len() + self.summary.len())
    }

    /// Appends `Human: <message>\nAI: <reply>` to the recent log.
    pub fn append_turn(&mut self, message: &str, reply: &str) {
        if !self.recent.is_empty() {
            self.recent.push('\n');
        }
        self.recent.push_str("Human: ");
        self.recent.push_str(message);
        self.recent.push_str("\nAI: ");
        self.recent.push_str(reply);
    }

    pub fn phase(&self, threshold: usize) -> MemoryPhase {
        if self.is_empty() {
            MemoryPhase::Empty
        } else if self.total_len() > threshold {
            MemoryPhase::OversizedPendingCompaction
        } else if self.recent.is_empty() {
            MemoryPhase::Compacted
        } else {
            MemoryPhase::Accumulating
        }
    }
}

/// Where a thread sits in its memory lifecycle.
///
/// `Empty -> Accumulating -> OversizedPendingCompaction`, then `Compacted`
/// when summarization succeeds or still oversized when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MemoryPhase {
    Empty,
    Accumulating,
    OversizedPendingCompaction,
    Compacted,
}

/// Serializes a state. Always emits both sentinels, even for an empty state.
pub fn encode(state: &ConversationState) -> String {
    let mut out = String::with_capacity(
        SUMMARY_SENTINEL.len() + state.summary.len() + RECENT_SENTINEL.len() + state.recent.len(),
    );
    out.push_str(SUMMARY_SENTINEL);
    out.push_str(&state.summary);
    out.push_str(RECENT_SENTINEL);
    out.push_str(&state.recent);
    out
}

/// Parses a persisted string. Total: every input maps to some state.
pub fn decode(raw: Option<&str>) -> ConversationState {
    let Some(raw) = raw else {
        return ConversationState::default();
    };

    if !raw.contains(SUMMARY_SENTINEL) {
        return ConversationState::new("", raw);
    }

    let (head, recent) = raw.split_once(RECENT_SENTINEL).unwrap_or((raw, ""));
    ConversationState::new(head.replacen(SUMMARY_SENTINEL, "", 1), recent)
}

/// Makes summarizer output safe to store as a summary.
///
/// Removes recent sentinels until none remain (removal can splice a new one
/// together), then pads with spaces if the text would still complete a
/// sentinel against the framing.
pub fn scrub_sentinels(text: &str) -> String {
    let mut out = text.to_string();
    while out.contains(RECENT_SENTINEL) {
        out = out.replace(RECENT_SENTINEL, "");
    }
    let probe = ConversationState::new(out, "");
    if probe.is_encodable() {
        probe.summary
    } else {
        format!(" {} ", probe.summary)
    }
}
