// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use hango_chat::{MemoryManager, Translator};
use hango_config::ServerConfig;
use hango_core::HangoError;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub manager: Arc<MemoryManager>,
    pub translator: Arc<Translator>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(manager: Arc<MemoryManager>, translator: Arc<Translator>) -> Self {
        Self {
            manager,
            translator,
            start_time: Instant::now(),
        }
    }
}

/// Assemble every route with CORS and request tracing.
///
/// Unknown paths answer 404 `{"error": "Not found"}`.
pub fn build_router(state: GatewayState) -> Router {
    let ai_routes = Router::new()
        .route("/chat", post(handlers::post_chat))
        .route("/friends", get(handlers::get_friends))
        .route("/translate", post(handlers::post_translate));

    Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_health))
        .nest("/ai", ai_routes)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind to `bind_address:port` and serve until `cancel` fires.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), HangoError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HangoError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("HanGo API listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| HangoError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}
