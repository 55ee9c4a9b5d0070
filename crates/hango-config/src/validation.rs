// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty paths, and sane memory thresholds.

use crate::diagnostic::ConfigError;
use crate::model::HangoConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HangoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let addr = config.server.bind_address.trim();
    if addr.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.bind_address must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.bind_address `{addr}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.service.log_level
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if !config.openai.base_url.starts_with("http://")
        && !config.openai.base_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "openai.base_url must be an http(s) URL, got `{}`",
                config.openai.base_url
            ),
        });
    }

    if config.openai.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "openai.timeout_secs must be at least 1".to_string(),
        });
    }

    let memory = &config.memory;
    if memory.compaction_threshold_chars == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.compaction_threshold_chars must be at least 1".to_string(),
        });
    }

    if memory.summary_target_chars >= memory.compaction_threshold_chars {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.summary_target_chars ({}) must be smaller than memory.compaction_threshold_chars ({})",
                memory.summary_target_chars, memory.compaction_threshold_chars
            ),
        });
    }

    if memory.summary_max_tokens == 0 || memory.reply_max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.summary_max_tokens and memory.reply_max_tokens must be at least 1"
                .to_string(),
        });
    }

    if !(0.0..=2.0).contains(&memory.reply_temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.reply_temperature must be within 0.0..=2.0, got {}",
                memory.reply_temperature
            ),
        });
    }

    for (name, value) in [
        ("presence_penalty", memory.presence_penalty),
        ("frequency_penalty", memory.frequency_penalty),
    ] {
        if !(-2.0..=2.0).contains(&value) {
            errors.push(ConfigError::Validation {
                message: format!("memory.{name} must be within -2.0..=2.0, got {value}"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
