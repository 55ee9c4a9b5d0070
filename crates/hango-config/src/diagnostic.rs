// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! miette diagnostics for `hango.toml` and `HANGO_*` overrides.
//!
//! Unknown keys get a Jaro-Winkler "did you mean" hint. Type errors name the
//! environment variable that could also have supplied the bad value.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;
use tracing::debug;

/// Catches `prot` -> `port` and `compaction_treshold_chars` without
/// suggesting unrelated keys.
const SUGGESTION_THRESHOLD: f64 = 0.75;

const ENV_PREFIX: &str = "HANGO_";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in {}", section_label(section))]
    #[diagnostic(
        code(hango::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Table the key appeared in, empty at top level.
        section: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a HanGo setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(
        code(hango::config::invalid_type),
        help("`{key}` expects {expected}; check hango.toml and {}", env_var_for(key))
    )]
    InvalidType {
        /// Dotted path, e.g. `server.port`.
        key: String,
        found: String,
        expected: String,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that deserialized but makes no sense for the service.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(hango::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(hango::config::other))]
    Other(String),
}

fn section_label(section: &str) -> String {
    if section.is_empty() {
        "hango.toml".to_string()
    } else {
        format!("[{section}]")
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? accepted keys: {valid_keys}"),
        None => format!("accepted keys: {valid_keys}"),
    }
}

/// `openai.api_key` -> `HANGO_OPENAI_API_KEY`.
pub fn env_var_for(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.replace('.', "_").to_uppercase())
}

/// Converts every error figment collected into a diagnostic.
///
/// `toml_sources` pairs a file path (as figment reports it) with its content
/// so that spans can point into the file.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for error in err {
        let path: Vec<String> = error.path.clone();
        debug!(path = %path.join("."), kind = %error.kind, "config error");

        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let suggestion = suggest_key(field, expected);
                let (span, src) = find_source_span(&error, &path, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    section: path.join("."),
                    suggestion,
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::InvalidType(found, expected) => {
                // The path ends with the offending field.
                let (span, src) = match path.split_last() {
                    Some((field, section)) => {
                        find_source_span(&error, section, field, toml_sources)
                    }
                    None => (None, None),
                };
                ConfigError::InvalidType {
                    key: path.join("."),
                    found: found.to_string(),
                    expected: expected.clone(),
                    span,
                    src,
                }
            }
            _ => ConfigError::Other(error.to_string()),
        };

        errors.push(config_error);
    }

    errors
}

/// Values from `HANGO_*` variables have no file and therefore no span.
fn find_source_span(
    error: &figment::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some(figment::Source::File(file)) = error.metadata.as_ref().and_then(|m| m.source.as_ref())
    else {
        return (None, None);
    };
    let file = file.display().to_string();

    toml_sources
        .iter()
        .find(|(path, _)| *path == file)
        .and_then(|(path, content)| {
            let offset = find_key_offset(content, section, field)?;
            Some((
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(path, content.clone())),
            ))
        })
        .unwrap_or((None, None))
}

/// Byte offset of `field` at the start of a line inside `[section]`, or
/// from the top of the file when `section` is empty.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let start = match section.first() {
        Some(name) => {
            let header = format!("[{name}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        // Stop at the next table so a same-named key elsewhere is not matched.
        if !section.is_empty() && trimmed.starts_with('[') {
            break;
        }
        if let Some(rest) = trimmed.strip_prefix(field) {
            if rest.trim_start().starts_with('=') {
                return Some(offset + line.len() - trimmed.len());
            }
        }
        offset += line.len();
    }

    None
}

/// Closest accepted key by Jaro-Winkler similarity, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Prints each diagnostic to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
    eprintln!(
        "hango: {} configuration error(s); run `hango config` once fixed to review the result",
        errors.len()
    );
}
