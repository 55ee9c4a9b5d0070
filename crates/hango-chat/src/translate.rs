// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona-styled translation of user text into Korean.

use std::sync::Arc;

use hango_core::persona::DEFAULT_TRANSLATION_STYLE;
use hango_core::{ChatMessage, CompletionGateway, CompletionRequest, HangoError, Persona};
use tracing::{debug, error};

pub const DEFAULT_TARGET_LANGUAGE: &str = "ko";

const TRANSLATION_TEMPERATURE: f32 = 0.3;
const TRANSLATION_MAX_TOKENS: u32 = 200;

#[derive(Debug, Clone)]
pub struct TranslateRequest {
    pub text: String,
    /// Echoed back to the caller; the prompt always targets Korean.
    pub target_language: String,
    /// Selects the speech style. `None` uses a neutral conversational style.
    pub persona: Option<Persona>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub translated_text: String,
    pub original_text: String,
    pub target_language: String,
}

pub struct Translator {
    gateway: Arc<dyn CompletionGateway>,
    model: String,
}

impl Translator {
    pub fn new(gateway: Arc<dyn CompletionGateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }

    /// Translates `request.text`. Empty model output falls back to the
    /// original text.
    pub async fn translate(&self, request: TranslateRequest) -> Result<Translation, HangoError> {
        if request.text.is_empty() {
            return Err(HangoError::Validation(
                "Missing required field: text".into(),
            ));
        }

        let style = request
            .persona
            .map(|p| p.translation_style())
            .unwrap_or(DEFAULT_TRANSLATION_STYLE);
        debug!(chars = request.text.chars().count(), style, "translation requested");

        let completion = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(translation_prompt(style)),
                ChatMessage::user(request.text.clone()),
            ],
            temperature: TRANSLATION_TEMPERATURE,
            max_output_tokens: TRANSLATION_MAX_TOKENS,
            presence_penalty: None,
            frequency_penalty: None,
        };
        let response = self.gateway.complete(completion).await.map_err(|e| {
            error!(error = %e, "translation failed");
            e
        })?;

        let trimmed = response.content.trim();
        let translated_text = if trimmed.is_empty() {
            request.text.clone()
        } else {
            trimmed.to_string()
        };

        Ok(Translation {
            translated_text,
            original_text: request.text,
            target_language: request.target_language,
        })
    }
}

pub fn translation_prompt(style: &str) -> String {
    format!(
        "You are a Korean translation expert. Translate the given text to natural conversational Korean.

Translation style: {style}

Guidelines:
- Translate to natural, spoken Korean (not written/formal Korean unless specified)
- Use appropriate speech level based on the relationship
- Keep the tone and emotion of the original text
- Make it sound like something a Korean speaker would actually say
- Output ONLY the translated Korean text, no explanations"
    )
}
