// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compaction: folds the recent log into the rolling summary via a
//! summarization call to keep the state within its character budget.

use hango_config::MemoryConfig;
use hango_core::{CompletionGateway, HangoError};
use tracing::info;

use crate::codec::{ConversationState, scrub_sentinels};
use crate::prompt::build_summary_request;

/// Whether a state has outgrown the threshold.
pub fn needs_compaction(state: &ConversationState, threshold: usize) -> bool {
    state.total_len() > threshold
}

/// Summarizes `state` into a new state with an empty recent log.
///
/// The input state is never modified; on error the caller keeps it as is.
/// Output that is blank once sentinels are scrubbed counts as a failure.
pub async fn compact(
    gateway: &dyn CompletionGateway,
    state: &ConversationState,
    model: &str,
    config: &MemoryConfig,
) -> Result<ConversationState, HangoError> {
    let request = build_summary_request(state, model, config);
    let response = gateway.complete(request).await?;

    let summary = scrub_sentinels(&response.content);
    if summary.trim().is_empty() {
        return Err(HangoError::Completion {
            message: "summarizer returned empty output".into(),
            source: None,
        });
    }

    info!(
        before_chars = state.total_len(),
        summary_chars = summary.chars().count(),
        model = %response.model,
        "conversation compacted"
    );

    Ok(ConversationState::new(summary, ""))
}
