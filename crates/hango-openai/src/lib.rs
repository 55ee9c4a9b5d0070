// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat-completions gateway for the HanGo chat backend.
//!
//! Implements [`CompletionGateway`] on top of [`OpenAiClient`]. One gateway
//! instance serves the reply, summarization and translation calls.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use hango_config::model::OpenAiConfig;
use hango_core::{
    AdapterType, CompletionGateway, CompletionRequest, CompletionResponse, HangoError,
    HealthStatus, PluginAdapter,
};
use tracing::{debug, info};

pub use crate::client::OpenAiClient;
use crate::types::ChatCompletionRequest;

/// Environment variable consulted when `openai.api_key` is unset.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI gateway implementing [`CompletionGateway`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiGateway {
    client: OpenAiClient,
}

impl OpenAiGateway {
    /// Builds the gateway from configuration.
    ///
    /// Fails with [`HangoError::Config`] when no API key can be resolved.
    pub fn new(config: &OpenAiConfig) -> Result<Self, HangoError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )?
        .with_base_url(config.base_url.clone());

        info!(
            base_url = %config.base_url,
            chat_model = %config.chat_model,
            "OpenAI gateway initialized"
        );

        Ok(Self::with_client(client))
    }

    /// Wraps an existing client.
    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiGateway {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, HangoError> {
        // No probe request: health checks must not spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HangoError> {
        debug!("OpenAI gateway shutting down");
        Ok(())
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, HangoError> {
        let api_request = ChatCompletionRequest::from(&request);
        let response = self.client.complete(&api_request).await?;

        let content = response.first_content();
        let model = if response.model.is_empty() {
            request.model
        } else {
            response.model
        };

        Ok(CompletionResponse {
            content,
            model,
            usage: response.usage.map(Into::into),
        })
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, HangoError> {
    if let Some(key) = config_key.as_deref().filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(HangoError::Config(format!(
            "OpenAI API key not found. Set openai.api_key in config or the {API_KEY_ENV} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hango_core::ChatMessage;
    use serial_test::serial;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> OpenAiGateway {
        let client = OpenAiClient::new("test-key", Duration::from_secs(5), 1)
            .unwrap()
            .with_base_url(server.uri());
        OpenAiGateway::with_client(client)
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4.1-mini".into(),
            messages: vec![ChatMessage::system("persona"), ChatMessage::user("Hi")],
            temperature: 0.8,
            max_output_tokens: 100,
            presence_penalty: Some(0.6),
            frequency_penalty: Some(0.3),
        }
    }

    #[test]
    fn resolve_api_key_prefers_config() {
        assert_eq!(resolve_api_key(&Some("sk-test-123".into())).unwrap(), "sk-test-123");
    }

    #[test]
    #[serial]
    fn resolve_api_key_falls_back_to_env() {
        // SAFETY: serialized with the other env-mutating test.
        unsafe { std::env::set_var(API_KEY_ENV, "sk-from-env") };
        assert_eq!(resolve_api_key(&Some(String::new())).unwrap(), "sk-from-env");
        assert_eq!(resolve_api_key(&None).unwrap(), "sk-from-env");
        unsafe { std::env::remove_var(API_KEY_ENV) };
    }

    #[test]
    #[serial]
    fn missing_api_key_is_a_config_error() {
        // SAFETY: serialized with the other env-mutating test.
        unsafe { std::env::remove_var(API_KEY_ENV) };
        let err = resolve_api_key(&None).unwrap_err();
        assert!(matches!(err, HangoError::Config(_)));
        assert!(err.to_string().contains("API key not found"));
    }

    #[tokio::test]
    async fn complete_maps_first_choice_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "gpt-4.1-mini-2025-04-14",
                "choices": [{"message": {"role": "assistant", "content": "Hello"}}],
                "usage": {"prompt_tokens": 20, "completion_tokens": 2}
            })))
            .mount(&server)
            .await;

        let response = gateway_for(&server).complete(request()).await.unwrap();
        assert_eq!(response.content, "Hello");
        assert_eq!(response.model, "gpt-4.1-mini-2025-04-14");
        assert_eq!(response.usage.unwrap().output_tokens, 2);
    }

    #[tokio::test]
    async fn empty_choices_yield_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&server)
            .await;

        let response = gateway_for(&server).complete(request()).await.unwrap();
        assert_eq!(response.content, "");
        assert_eq!(response.model, "gpt-4.1-mini");
        assert!(response.usage.is_none());
    }

    #[test]
    fn plugin_adapter_metadata() {
        let client = OpenAiClient::new("test-key", Duration::from_secs(5), 1).unwrap();
        let gateway = OpenAiGateway::with_client(client);

        assert_eq!(gateway.name(), "openai");
        assert_eq!(gateway.version(), semver::Version::new(0, 1, 0));
        assert_eq!(gateway.adapter_type(), AdapterType::Completion);
    }
}
