// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment errors are turned into [`ConfigError`] values that miette renders
//! with the offending line highlighted and, for misspelled keys, the closest
//! valid key (Jaro-Winkler).

#![allow(unused_assignments)] // emitted by the miette derive

use figment::error::{Error as FigmentError, Kind};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Below this Jaro-Winkler score no key is suggested.
const MIN_SIMILARITY: f64 = 0.75;

/// One configuration problem, ready for miette rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("`{key}` is not a recognized setting")]
    #[diagnostic(code(orchestra::config::unknown_key), help("{}", unknown_key_help(suggestion.as_deref(), valid_keys)))]
    UnknownKey {
        key: String,
        /// Closest valid key, if any is similar enough.
        suggestion: Option<String>,
        /// Comma-separated keys accepted in the same table.
        valid_keys: String,
        #[label("unknown key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(orchestra::config::invalid_type), help("use a {expected} here"))]
    InvalidType {
        /// Dotted path, e.g. `dispatch.request_timeout_secs`.
        key: String,
        detail: String,
        expected: String,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` is required")]
    #[diagnostic(code(orchestra::config::missing_key), help("set `{key}` in orchestra.toml"))]
    MissingKey { key: String },

    /// A value parsed but is not acceptable.
    #[error("{message}")]
    #[diagnostic(code(orchestra::config::validation))]
    Validation { message: String },

    #[error("{0}")]
    #[diagnostic(code(orchestra::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(suggestion) => format!("did you mean `{suggestion}`? (accepted: {valid_keys})"),
        None => format!("accepted keys: {valid_keys}"),
    }
}

/// A TOML file that took part in loading, kept for span lookups.
struct TomlSource<'a> {
    name: &'a str,
    content: &'a str,
}

impl<'a> TomlSource<'a> {
    /// The source the figment error was read from, if it was one of ours.
    fn for_error(error: &FigmentError, sources: &'a [(String, String)]) -> Option<Self> {
        let origin = match error.metadata.as_ref()?.source.as_ref()? {
            figment::Source::File(path) => path.display().to_string(),
            figment::Source::Code(_) | figment::Source::Custom(_) => {
                // Inline strings carry no path; there is at most one.
                return sources
                    .iter()
                    .find(|(name, _)| name == "<inline>")
                    .map(|(name, content)| Self { name, content });
            }
            _ => return None,
        };
        sources
            .iter()
            .find(|(name, _)| *name == origin)
            .map(|(name, content)| Self { name, content })
    }

    /// Span of `key` inside the `[table]` named by `table_path`.
    fn locate(&self, table_path: &[String], key: &str) -> Option<(SourceSpan, NamedSource<String>)> {
        let offset = find_key_offset(self.content, table_path, key)?;
        Some((
            SourceSpan::new(offset.into(), key.len()),
            NamedSource::new(self.name, self.content.to_string()),
        ))
    }
}

/// Convert every error figment collected into a diagnostic.
pub fn figment_to_config_errors(
    err: FigmentError,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &FigmentError, toml_sources: &[(String, String)]) -> ConfigError {
    let source = TomlSource::for_error(error, toml_sources);

    match &error.kind {
        Kind::UnknownField(key, accepted) => {
            let (span, src) = source
                .and_then(|s| s.locate(&error.path, key))
                .unzip();
            ConfigError::UnknownKey {
                key: key.clone(),
                suggestion: suggest_key(key, accepted),
                valid_keys: accepted.join(", "),
                span,
                src,
            }
        }
        Kind::InvalidType(actual, expected) => {
            let (table, key) = match error.path.split_last() {
                Some((key, table)) => (table, key.as_str()),
                None => (&[][..], ""),
            };
            let (span, src) = source.and_then(|s| s.locate(table, key)).unzip();
            ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}"),
                expected: expected.to_string(),
                span,
                src,
            }
        }
        Kind::MissingField(key) => ConfigError::MissingKey {
            key: if error.path.is_empty() {
                key.to_string()
            } else {
                format!("{}.{key}", error.path.join("."))
            },
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

/// Byte offset of `key` as the first token of a line inside `[table]`.
///
/// An empty `table_path` searches from the top of the file. The search does
/// not stop at the next table header, so a key that only appears in a later
/// table is still found.
pub fn find_key_offset(content: &str, table_path: &[String], key: &str) -> Option<usize> {
    let start = if table_path.is_empty() {
        0
    } else {
        let header = format!("[{}]", table_path.join("."));
        content.find(&header)? + header.len()
    };

    let mut line_start = start;
    for line in content[start..].split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];
        if let Some(after) = rest.strip_prefix(key)
            && after.trim_start().starts_with('=')
        {
            return Some(line_start + indent);
        }
        line_start += line.len();
    }
    None
}

/// Closest accepted key to `unknown`, if any is similar enough.
pub fn suggest_key(unknown: &str, accepted: &[&str]) -> Option<String> {
    accepted
        .iter()
        .map(|candidate| (strsim::jaro_winkler(unknown, candidate), *candidate))
        .filter(|(score, _)| *score > MIN_SIMILARITY)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}

/// Print each diagnostic to stderr with miette's graphical renderer.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("config error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_kdf_salt_for_typo() {
        let valid = &["master_secret_env", "kdf_salt"];
        assert_eq!(suggest_key("kdf_slat", valid), Some("kdf_salt".to_string()));
    }

    #[test]
    fn suggest_request_timeout_for_missing_suffix() {
        let valid = &["request_timeout_secs", "anthropic_max_tokens", "anthropic_version"];
        assert_eq!(
            suggest_key("request_timeout", valid),
            Some("request_timeout_secs".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["database_path", "wal_mode"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_nested_section() {
        let content = "[vault]\nkdf_salt = \"x\"\n\n[providers.openai]\nbase_ur = \"http://x\"\n";
        let path = vec!["providers".to_string(), "openai".to_string()];
        let offset = find_key_offset(content, &path, "base_ur").unwrap();
        assert_eq!(&content[offset..offset + 7], "base_ur");
    }

    #[test]
    fn find_key_offset_ignores_prefix_matches() {
        let content = "[dispatch]\nanthropic_max_tokens = 1\nanthropic = 2\n";
        let path = vec!["dispatch".to_string()];
        let offset = find_key_offset(content, &path, "anthropic").unwrap();
        assert_eq!(&content[offset..offset + 13], "anthropic = 2");
    }

    #[test]
    fn find_key_offset_missing_section() {
        let content = "[vault]\nkdf_salt = \"x\"\n";
        let path = vec!["storage".to_string()];
        assert_eq!(find_key_offset(content, &path, "kdf_salt"), None);
    }

    #[test]
    fn unknown_key_help_lists_accepted_keys() {
        assert_eq!(
            unknown_key_help(Some("wal_mode"), "database_path, wal_mode"),
            "did you mean `wal_mode`? (accepted: database_path, wal_mode)"
        );
        assert_eq!(unknown_key_help(None, "level"), "accepted keys: level");
    }
}
