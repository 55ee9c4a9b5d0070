// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion gateway trait for chat-completion services (OpenAI, etc.).

use async_trait::async_trait;

use crate::error::HangoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Opaque capability for text completion.
///
/// Used for the user-facing reply, for summarization during compaction, and
/// for translation. Implementations are stateless from the caller's point of
/// view and safe to share across all threads.
#[async_trait]
pub trait CompletionGateway: PluginAdapter {
    /// Sends a completion request and returns the first choice.
    ///
    /// A non-success status, a transport failure, or a timeout is an error;
    /// no partial content is ever returned.
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionResponse, HangoError>;
}
