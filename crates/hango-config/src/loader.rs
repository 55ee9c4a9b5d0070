// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hango.toml` > `~/.config/hango/hango.toml` > `/etc/hango/hango.toml`
//! with environment variable overrides via `HANGO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HangoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hango/hango.toml` (system-wide)
/// 3. `~/.config/hango/hango.toml` (user XDG config)
/// 4. `./hango.toml` (local directory)
/// 5. `HANGO_*` environment variables
pub fn load_config() -> Result<HangoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HangoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HangoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HangoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HangoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HangoConfig::default()))
        .merge(Toml::file("/etc/hango/hango.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("hango/hango.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("hango.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `HANGO_OPENAI_API_KEY` must map to `openai.api_key`, not
/// `openai.api.key`.
fn env_provider() -> Env {
    Env::prefixed("HANGO_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("memory_", "memory.", 1);
        mapped.into()
    })
}
