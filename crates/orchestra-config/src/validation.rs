// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::OrchestraConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &OrchestraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let env = config.vault.master_secret_env.trim();
    if env.is_empty() {
        errors.push(validation("vault.master_secret_env must not be empty"));
    } else if !env
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        errors.push(validation(format!(
            "vault.master_secret_env `{env}` is not a valid environment variable name"
        )));
    }

    if config.vault.kdf_salt.is_empty() {
        errors.push(validation("vault.kdf_salt must not be empty"));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(validation("storage.database_path must not be empty"));
    }

    if config.dispatch.request_timeout_secs == 0 {
        errors.push(validation("dispatch.request_timeout_secs must be greater than 0"));
    }

    if config.dispatch.anthropic_max_tokens == 0 {
        errors.push(validation("dispatch.anthropic_max_tokens must be greater than 0"));
    }

    if config.dispatch.anthropic_version.trim().is_empty() {
        errors.push(validation("dispatch.anthropic_version must not be empty"));
    }

    for (name, provider) in config.providers.iter() {
        if let Some(url) = &provider.base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            errors.push(validation(format!(
                "providers.{name}.base_url must start with http:// or https://, got `{url}`"
            )));
        }
        if let Some(model) = &provider.default_model
            && model.trim().is_empty()
        {
            errors.push(validation(format!(
                "providers.{name}.default_model must not be empty when set"
            )));
        }
    }

    if !matches!(
        config.logging.level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(validation(format!(
            "logging.level must be one of trace, debug, info, warn, error; got `{}`",
            config.logging.level
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}
