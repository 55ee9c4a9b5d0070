// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion requests built from a conversation state.

use hango_config::MemoryConfig;
use hango_core::{ChatMessage, CompletionRequest, Persona};

use crate::codec::ConversationState;

/// Returned to the user when the model produces an empty reply.
pub const FALLBACK_REPLY: &str = "Sorry, I could not generate a response.";

/// Persona prompt followed by whichever memory segments are non-empty.
pub fn reply_system_prompt(persona: Persona, state: &ConversationState) -> String {
    let mut prompt = persona.system_prompt().to_string();
    if !state.summary.is_empty() {
        prompt.push_str("\n\nPrevious conversation summary:\n");
        prompt.push_str(&state.summary);
    }
    if !state.recent.is_empty() {
        prompt.push_str("\n\nRecent conversation:\n");
        prompt.push_str(&state.recent);
    }
    prompt
}

pub fn build_reply_request(
    persona: Persona,
    state: &ConversationState,
    message: &str,
    model: &str,
    config: &MemoryConfig,
) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(reply_system_prompt(persona, state)),
            ChatMessage::user(message),
        ],
        temperature: config.reply_temperature,
        max_output_tokens: config.reply_max_tokens,
        presence_penalty: Some(config.presence_penalty),
        frequency_penalty: Some(config.frequency_penalty),
    }
}

/// The text handed to the summarizer. Note the missing newline after each
/// label, unlike the reply prompt.
pub fn summarization_input(state: &ConversationState) -> String {
    if state.summary.is_empty() {
        format!("Recent conversation:{}", state.recent)
    } else {
        format!(
            "Previous conversation summary:{}\n\nRecent conversation:{}",
            state.summary, state.recent
        )
    }
}

pub fn summarization_instruction(target_chars: usize) -> String {
    format!(
        "Summarize the following conversation history in English within {target_chars} characters. \
         Keep important context, key points, topics discussed, and user preferences. \
         Focus on what matters for future conversations. End with complete sentences."
    )
}

pub fn build_summary_request(
    state: &ConversationState,
    model: &str,
    config: &MemoryConfig,
) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(summarization_instruction(config.summary_target_chars)),
            ChatMessage::user(summarization_input(state)),
        ],
        temperature: 0.0,
        max_output_tokens: config.summary_max_tokens,
        presence_penalty: None,
        frequency_penalty: None,
    }
}
