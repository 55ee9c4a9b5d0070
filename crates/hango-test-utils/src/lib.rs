// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for HanGo integration tests.
//!
//! # Components
//!
//! - [`MockGateway`] - scripted completion gateway that records requests
//! - [`InMemoryThreadStore`] - thread store with read/write failure injection
//! - [`TestHarness`] - memory manager over a temp SQLite store and a mock gateway

pub mod harness;
pub mod memory_store;
pub mod mock_gateway;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_store::InMemoryThreadStore;
pub use mock_gateway::{DEFAULT_REPLY, MockGateway, MockReply, is_summary_request};
