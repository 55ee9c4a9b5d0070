// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the HanGo chat backend.

use thiserror::Error;

/// The primary error type used across all HanGo adapter traits and core operations.
#[derive(Debug, Error)]
pub enum HangoError {
    /// Configuration errors (missing credentials, invalid values). Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed caller input, rejected before any state is touched.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Completion service errors (non-success status, transport failure, bad body).
    #[error("completion error: {message}")]
    Completion {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HangoError {
    /// Wraps any storage-layer error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HangoError::Storage {
            source: Box::new(err),
        }
    }

    /// Returns true for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, HangoError::Validation(_))
    }
}
