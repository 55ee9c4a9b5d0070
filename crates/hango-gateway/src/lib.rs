// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the HanGo chat backend.
//!
//! Maps the JSON API onto the memory manager and translator:
//!
//! - `GET /` and `GET /health`
//! - `POST /ai/chat`
//! - `GET /ai/friends`
//! - `POST /ai/translate`

pub mod handlers;
pub mod server;

pub use server::{GatewayState, build_router, start_server};
