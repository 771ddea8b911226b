// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Orchestra.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Orchestra configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrchestraConfig {
    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Durable credential store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbound provider call settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Per-provider endpoint overrides.
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Log filter settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Credential vault configuration.
///
/// The master secret itself never appears in configuration; only the name of
/// the environment variable that carries it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Environment variable holding the master secret.
    #[serde(default = "default_master_secret_env")]
    pub master_secret_env: String,

    /// PBKDF2 salt. Changing it makes existing records undecryptable.
    #[serde(default = "default_kdf_salt")]
    pub kdf_salt: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            master_secret_env: default_master_secret_env(),
            kdf_salt: default_kdf_salt(),
        }
    }
}

fn default_master_secret_env() -> String {
    "ORCHESTRA_MASTER_SECRET".to_string()
}

fn default_kdf_salt() -> String {
    "ai-orchestration-vault-v1".to_string()
}

/// Storage configuration.
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
        .map(|p| p.join("orchestra").join("orchestra.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("orchestra.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Provider dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Timeout applied to each outbound provider call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// `max_tokens` sent on Anthropic messages requests.
    #[serde(default = "default_anthropic_max_tokens")]
    pub anthropic_max_tokens: u32,

    /// Value of the `anthropic-version` header.
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            anthropic_max_tokens: default_anthropic_max_tokens(),
            anthropic_version: default_anthropic_version(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_anthropic_max_tokens() -> u32 {
    4096
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

/// Endpoint overrides, one table per dispatchable provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderOverride,
    #[serde(default)]
    pub anthropic: ProviderOverride,
    #[serde(default)]
    pub xai: ProviderOverride,
    #[serde(default)]
    pub perplexity: ProviderOverride,
    #[serde(default)]
    pub google: ProviderOverride,
}

impl ProvidersConfig {
    /// Iterate `(provider id, override)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ProviderOverride)> {
        [
            ("openai", &self.openai),
            ("anthropic", &self.anthropic),
            ("xai", &self.xai),
            ("perplexity", &self.perplexity),
            ("google", &self.google),
        ]
        .into_iter()
    }
}

/// Optional replacement of a provider's base URL or default model.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderOverride {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub default_model: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level for `orchestra` targets when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
