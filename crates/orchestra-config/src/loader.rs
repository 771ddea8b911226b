// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./orchestra.toml` > `~/.config/orchestra/orchestra.toml`
//! > `/etc/orchestra/orchestra.toml` with environment variable overrides via the
//! `ORCHESTRA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::OrchestraConfig;

pub const LOCAL_CONFIG_FILE: &str = "orchestra.toml";
pub const SYSTEM_CONFIG_FILE: &str = "/etc/orchestra/orchestra.toml";

/// Sections that may be overridden from `ORCHESTRA_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &["vault", "storage", "dispatch", "logging"];

/// Provider override tables, addressed as `ORCHESTRA_PROVIDERS_<NAME>_<KEY>`.
const ENV_PROVIDER_TABLES: &[&str] = &["openai", "anthropic", "xai", "perplexity", "google"];

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("orchestra").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/orchestra/orchestra.toml`
/// 3. `~/.config/orchestra/orchestra.toml`
/// 4. `./orchestra.toml`
/// 5. `ORCHESTRA_*` environment variables
pub fn load_config() -> Result<OrchestraConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<OrchestraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OrchestraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OrchestraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OrchestraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(OrchestraConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_FILE))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// `Env::split("_")` would turn `ORCHESTRA_VAULT_KDF_SALT` into
/// `vault.kdf.salt`; only the first segment names the section. Variables that
/// do not start with a known section (such as the master secret itself,
/// `ORCHESTRA_MASTER_SECRET`) are ignored rather than rejected as unknown keys.
fn env_provider() -> Env {
    Env::prefixed("ORCHESTRA_")
        .filter(|key| map_env_key(&key.as_str().to_ascii_lowercase()).is_some())
        .map(|key| {
            map_env_key(&key.as_str().to_ascii_lowercase())
                .unwrap_or_default()
                .into()
        })
}

/// Map a lowercased, prefix-stripped variable name to a dotted config path.
pub fn map_env_key(key: &str) -> Option<String> {
    if let Some(rest) = key.strip_prefix("providers_") {
        return ENV_PROVIDER_TABLES.iter().find_map(|table| {
            rest.strip_prefix(table)
                .and_then(|r| r.strip_prefix('_'))
                .filter(|field| !field.is_empty())
                .map(|field| format!("providers.{table}.{field}"))
        });
    }
    ENV_SECTIONS.iter().find_map(|section| {
        key.strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
            .filter(|field| !field.is_empty())
            .map(|field| format!("{section}.{field}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_section_keys_with_underscores() {
        assert_eq!(map_env_key("vault_kdf_salt").as_deref(), Some("vault.kdf_salt"));
        assert_eq!(
            map_env_key("dispatch_request_timeout_secs").as_deref(),
            Some("dispatch.request_timeout_secs")
        );
        assert_eq!(
            map_env_key("providers_openai_base_url").as_deref(),
            Some("providers.openai.base_url")
        );
    }

    #[test]
    fn ignores_variables_outside_known_sections() {
        assert_eq!(map_env_key("master_secret"), None);
        assert_eq!(map_env_key("credential"), None);
        assert_eq!(map_env_key("providers_mistral_base_url"), None);
        assert_eq!(map_env_key("vault"), None);
    }
}
