// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the HanGo chat backend.
//!
//! This crate provides the trait definitions, error types, persona enumeration
//! and common types shared by the memory manager, the storage backend, the
//! completion client and the HTTP gateway.

pub mod error;
pub mod persona;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HangoError;
pub use persona::{Persona, PersonaProfile};
pub use types::{
    AdapterType, ChatMessage, CompletionRequest, CompletionResponse, HealthStatus, Role,
    ThreadRecord, TokenUsage,
};

pub use traits::{CompletionGateway, PluginAdapter, ThreadStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hango_error_has_all_variants() {
        let _config = HangoError::Config("test".into());
        let _validation = HangoError::Validation("test".into());
        let _storage = HangoError::storage(std::io::Error::other("test"));
        let _completion = HangoError::Completion {
            message: "test".into(),
            source: None,
        };
        let _timeout = HangoError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = HangoError::Internal("test".into());
    }

    #[test]
    fn only_validation_is_a_client_error() {
        assert!(HangoError::Validation("missing".into()).is_client_error());
        assert!(!HangoError::Internal("boom".into()).is_client_error());
        assert!(
            !HangoError::Completion {
                message: "500".into(),
                source: None
            }
            .is_client_error()
        );
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [AdapterType::Completion, AdapterType::ThreadStore] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn role_serializes_lowercase() {
        let msg = ChatMessage::system("be nice");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn request_accessors_find_system_and_user_content() {
        let request = CompletionRequest {
            model: "test-model".into(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.0,
            max_output_tokens: 10,
            presence_penalty: None,
            frequency_penalty: None,
        };
        assert_eq!(request.system_content(), Some("sys"));
        assert_eq!(request.user_content(), Some("hi"));
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_completion_gateway<T: CompletionGateway>() {}
        fn _assert_thread_store<T: ThreadStore>() {}
    }
}
