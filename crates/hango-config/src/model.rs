// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the HanGo chat backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level HanGo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HangoConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat-completions API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Conversation memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "hango".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

/// Chat-completions API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Full URL of the chat-completions endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for replies and summarization.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used for translation.
    #[serde(default = "default_translation_model")]
    pub translation_model: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient statuses (429, 500, 503).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            translation_model: default_translation_model(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_chat_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_translation_model() -> String {
    "gpt-4.1-nano".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    1
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("hango").join("hango.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("hango.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Conversation memory configuration.
///
/// Controls the compaction trigger, the summarization call, and the decoding
/// settings of the reply call.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Compaction runs when `len(summary) + len(recent)` exceeds this many characters.
    #[serde(default = "default_compaction_threshold_chars")]
    pub compaction_threshold_chars: usize,

    /// Length bound stated to the summarizer, in characters.
    #[serde(default = "default_summary_target_chars")]
    pub summary_target_chars: usize,

    /// Output token ceiling for the summarization call.
    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,

    /// Output token ceiling for the reply call.
    #[serde(default = "default_reply_max_tokens")]
    pub reply_max_tokens: u32,

    /// Sampling temperature for the reply call.
    #[serde(default = "default_reply_temperature")]
    pub reply_temperature: f32,

    /// Presence penalty for the reply call.
    #[serde(default = "default_presence_penalty")]
    pub presence_penalty: f32,

    /// Frequency penalty for the reply call.
    #[serde(default = "default_frequency_penalty")]
    pub frequency_penalty: f32,

    /// Serialize turns per thread id. When false, concurrent turns on the
    /// same thread race and the last write wins.
    #[serde(default = "default_serialize_threads")]
    pub serialize_threads: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            compaction_threshold_chars: default_compaction_threshold_chars(),
            summary_target_chars: default_summary_target_chars(),
            summary_max_tokens: default_summary_max_tokens(),
            reply_max_tokens: default_reply_max_tokens(),
            reply_temperature: default_reply_temperature(),
            presence_penalty: default_presence_penalty(),
            frequency_penalty: default_frequency_penalty(),
            serialize_threads: default_serialize_threads(),
        }
    }
}

fn default_compaction_threshold_chars() -> usize {
    8000
}

fn default_summary_target_chars() -> usize {
    4000
}

fn default_summary_max_tokens() -> u32 {
    2000
}

fn default_reply_max_tokens() -> u32 {
    100
}

fn default_reply_temperature() -> f32 {
    0.8
}

fn default_presence_penalty() -> f32 {
    0.6
}

fn default_frequency_penalty() -> f32 {
    0.3
}

fn default_serialize_threads() -> bool {
    true
}

impl HangoConfig {
    /// Returns a copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.openai.api_key.is_some() {
            config.openai.api_key = Some("********".to_string());
        }
        config
    }
}
