// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI chat-completions API.
//!
//! [`OpenAiClient`] handles authentication, request timeouts and a single
//! retry of transient errors.

use std::time::Duration;

use hango_core::HangoError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// Default chat-completions endpoint.
pub const API_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// HTTP client for OpenAI API communication.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
}

impl OpenAiClient {
    /// Creates a client that authenticates with `api_key` as a bearer token.
    pub fn new(api_key: &str, timeout: Duration, max_retries: u32) -> Result<Self, HangoError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| HangoError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| HangoError::Completion {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            timeout,
            max_retries,
        })
    }

    /// Points the client at a different endpoint (proxies, wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a completion request and parses the full response.
    ///
    /// On transient errors (429, 500, 503) retries up to `max_retries` times
    /// after a 1-second delay. Any other non-success status fails immediately.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, HangoError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let response = self
                .client
                .post(&self.base_url)
                .json(request)
                .send()
                .await
                .map_err(|e| self.map_transport_err(e))?;

            let status = response.status();
            debug!(status = %status, attempt, model = %request.model, "completion response received");

            if status.is_success() {
                let body = response
                    .text()
                    .await
                    .map_err(|e| self.map_transport_err(e))?;
                return serde_json::from_str(&body).map_err(|e| HangoError::Completion {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(HangoError::Completion {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            return Err(HangoError::Completion {
                message: describe_error(status, &body),
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| HangoError::Completion {
            message: "completion request failed after retries".into(),
            source: None,
        }))
    }

    fn map_transport_err(&self, e: reqwest::Error) -> HangoError {
        if e.is_timeout() {
            HangoError::Timeout {
                duration: self.timeout,
            }
        } else {
            HangoError::Completion {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!(
            "OpenAI API error {status} ({}): {}",
            api_err.error.type_.as_deref().unwrap_or("unknown"),
            api_err.error.message
        ),
        Err(_) => format!("API returned {status}: {body}"),
    }
}
