// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the HanGo API.
//!
//! Request bodies use camelCase field names. Every failure answers
//! `{"success": false, "error": ...}` except the 404 fallback.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hango_chat::translate::DEFAULT_TARGET_LANGUAGE;
use hango_chat::{TranslateRequest, TurnRequest, now_timestamp};
use hango_core::{HangoError, HealthStatus, Persona, PersonaProfile};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, error, info_span, warn};

use crate::server::GatewayState;

pub const MISSING_CHAT_FIELDS: &str =
    "Missing required fields: userId, chatId, aiFriendId, userMessage";
pub const MISSING_TEXT: &str = "Missing required field: text";

/// Request body for POST /ai/chat.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub ai_friend_id: Option<String>,
    #[serde(default)]
    pub user_message: Option<String>,
    /// Stored as reported.
    #[serde(default)]
    pub total_message_count: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

/// Request body for POST /ai/translate.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateBody {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub ai_friend_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub success: bool,
    pub translated_text: String,
    pub original_text: String,
    pub target_language: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct FriendsResponse {
    pub success: bool,
    pub friends: Vec<PersonaProfile>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every component is healthy, otherwise `degraded`.
    pub status: &'static str,
    pub version: String,
    pub uptime_secs: u64,
    pub components: BTreeMap<String, String>,
}

/// Error body for API routes.
#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
}

/// Error body for the 404 fallback.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn failure(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(FailureResponse {
            success: false,
            error: error.into(),
        }),
    )
        .into_response()
}

fn error_status(err: &HangoError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Empty strings count as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// GET /
pub async fn get_root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        message: "HanGo API is running",
    })
}

/// GET /health
///
/// Runs the health check of the thread store and the completion gateway.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let store = state.manager.store();
    let gateway = state.manager.gateway();
    let checks = [
        (store.name().to_string(), store.health_check().await),
        (gateway.name().to_string(), gateway.health_check().await),
    ];

    let mut healthy = true;
    let mut components = BTreeMap::new();
    for (name, result) in checks {
        let status = match result {
            Ok(HealthStatus::Healthy) => "healthy".to_string(),
            Ok(HealthStatus::Degraded(reason)) => {
                healthy = false;
                format!("degraded: {reason}")
            }
            Ok(HealthStatus::Unhealthy(reason)) => {
                healthy = false;
                format!("unhealthy: {reason}")
            }
            Err(e) => {
                healthy = false;
                format!("unhealthy: {e}")
            }
        };
        components.insert(name, status);
    }

    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        components,
    };
    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(body)).into_response()
}

/// POST /ai/chat
///
/// The turn runs in its own task so a client disconnect does not cancel a
/// reply that is about to be persisted.
pub async fn post_chat(
    State(state): State<GatewayState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let (Some(user_id), Some(chat_id), Some(ai_friend_id), Some(user_message)) = (
        present(body.user_id),
        present(body.chat_id),
        present(body.ai_friend_id),
        present(body.user_message),
    ) else {
        return failure(StatusCode::BAD_REQUEST, MISSING_CHAT_FIELDS);
    };

    let Ok(persona) = ai_friend_id.parse::<Persona>() else {
        return failure(
            StatusCode::BAD_REQUEST,
            format!(
                "Invalid aiFriendId: {ai_friend_id}. Must be one of: {}",
                Persona::valid_ids()
            ),
        );
    };

    let request = TurnRequest {
        thread_id: chat_id,
        user_id,
        persona,
        message: user_message,
        message_count: body.total_message_count,
    };
    let span = info_span!(
        "chat_turn",
        request_id = %uuid::Uuid::new_v4(),
        thread_id = %request.thread_id,
        persona = %request.persona,
    );
    let manager = state.manager.clone();
    let turn = tokio::spawn(async move { manager.process_turn(request).await }.instrument(span));

    match turn.await {
        Ok(Ok(outcome)) => {
            if outcome.is_degraded() {
                warn!(degradations = ?outcome.degradations, "chat turn completed degraded");
            }
            Json(ChatResponse {
                success: true,
                message: outcome.reply,
                timestamp: outcome.timestamp,
            })
            .into_response()
        }
        Ok(Err(e)) => failure(error_status(&e), e.to_string()),
        Err(e) => {
            error!(error = %e, "chat task failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// GET /ai/friends
pub async fn get_friends() -> Json<FriendsResponse> {
    Json(FriendsResponse {
        success: true,
        friends: Persona::all().iter().map(Persona::profile).collect(),
    })
}

/// POST /ai/translate
///
/// An unknown or absent `aiFriendId` uses the neutral speech style.
pub async fn post_translate(
    State(state): State<GatewayState>,
    payload: Result<Json<TranslateBody>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let Some(text) = present(body.text) else {
        return failure(StatusCode::BAD_REQUEST, MISSING_TEXT);
    };

    let request = TranslateRequest {
        text,
        target_language: body
            .target_language
            .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string()),
        persona: body.ai_friend_id.and_then(|id| id.parse().ok()),
    };

    match state.translator.translate(request).await {
        Ok(translation) => Json(TranslateResponse {
            success: true,
            translated_text: translation.translated_text,
            original_text: translation.original_text,
            target_language: translation.target_language,
            timestamp: now_timestamp(),
        })
        .into_response(),
        Err(e) => failure(error_status(&e), e.to_string()),
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}
