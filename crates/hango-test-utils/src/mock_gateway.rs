// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted completion gateway for deterministic testing.
//!
//! `MockGateway` implements `CompletionGateway` with a FIFO of scripted
//! replies and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use hango_core::{
    AdapterType, CompletionGateway, CompletionRequest, CompletionResponse, HangoError,
    HealthStatus, PluginAdapter, TokenUsage,
};

/// Reply returned when the script is exhausted.
pub const DEFAULT_REPLY: &str = "mock response";

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful completion with this content.
    Text(String),
    /// Successful completion with empty content.
    Empty,
    /// Non-success status from the service.
    Fail(u16),
    /// The call timed out.
    Timeout,
}

impl MockReply {
    pub fn text(content: impl Into<String>) -> Self {
        MockReply::Text(content.into())
    }
}

/// A completion gateway that pops scripted replies in call order.
pub struct MockGateway {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Option<Duration>,
}

impl MockGateway {
    /// Create a gateway with an empty script.
    pub fn new() -> Self {
        Self::with_replies(Vec::new())
    }

    /// Create a gateway pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Sleep this long inside every call, after the request is recorded.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Append a reply to the script.
    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Requests whose system prompt is the summarization instruction.
    pub async fn summary_requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| is_summary_request(r))
            .cloned()
            .collect()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// True when the request carries the summarizer's system instruction.
pub fn is_summary_request(request: &CompletionRequest) -> bool {
    request
        .system_content()
        .is_some_and(|s| s.starts_with("Summarize the following conversation history"))
}

#[async_trait]
impl PluginAdapter for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, HangoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HangoError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionGateway for MockGateway {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, HangoError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);
        let reply = self.replies.lock().await.pop_front();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let content = match reply {
            None => DEFAULT_REPLY.to_string(),
            Some(MockReply::Text(text)) => text,
            Some(MockReply::Empty) => String::new(),
            Some(MockReply::Fail(status)) => {
                return Err(HangoError::Completion {
                    message: format!("API returned {status}"),
                    source: None,
                });
            }
            Some(MockReply::Timeout) => {
                return Err(HangoError::Timeout {
                    duration: Duration::from_secs(60),
                });
            }
        };

        Ok(CompletionResponse {
            content,
            model,
            usage: Some(TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hango_core::ChatMessage;

    fn request(system: &str) -> CompletionRequest {
        CompletionRequest {
            model: "mock-model".into(),
            messages: vec![ChatMessage::system(system), ChatMessage::user("hi")],
            temperature: 0.0,
            max_output_tokens: 10,
            presence_penalty: None,
            frequency_penalty: None,
        }
    }

    #[tokio::test]
    async fn replies_are_served_in_order_then_default() {
        let gateway =
            MockGateway::with_replies(vec![MockReply::text("one"), MockReply::Fail(500)]);

        assert_eq!(gateway.complete(request("p")).await.unwrap().content, "one");
        assert!(gateway.complete(request("p")).await.is_err());
        assert_eq!(gateway.complete(request("p")).await.unwrap().content, DEFAULT_REPLY);
        assert_eq!(gateway.call_count().await, 3);
    }

    #[tokio::test]
    async fn summary_requests_are_recognised() {
        let gateway = MockGateway::new();
        gateway.complete(request("persona")).await.unwrap();
        gateway
            .complete(request("Summarize the following conversation history in English"))
            .await
            .unwrap();
        assert_eq!(gateway.summary_requests().await.len(), 1);
    }
}
