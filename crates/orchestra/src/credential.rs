// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `orchestra credential` command implementations.

use std::str::FromStr;

use colored::Colorize;
use orchestra_core::{CredentialId, CredentialSummary, OrchestraError, ProviderKind, TenantId};
use orchestra_vault::format::MIN_SECRET_LEN;
use orchestra_vault::{mask_secret, validate_format_for, CredentialVault};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// Parse a credential provider id, accepting `gemini` for `google`.
pub fn parse_provider(provider: &str) -> Result<ProviderKind, OrchestraError> {
    ProviderKind::from_str(provider.trim()).map_err(|_| OrchestraError::UnsupportedProvider {
        provider: provider.to_string(),
    })
}

/// Structured output of `credential add`.
#[derive(Debug, Serialize)]
pub struct AddedCredential {
    #[serde(flatten)]
    pub summary: CredentialSummary,
    pub masked: String,
}

/// Validate and store a credential. The secret is only echoed masked.
pub async fn add(
    vault: &CredentialVault,
    tenant_id: &TenantId,
    provider: ProviderKind,
    secret: &SecretString,
    label: Option<&str>,
) -> Result<AddedCredential, OrchestraError> {
    let secret = secret.expose_secret();
    if !validate_format_for(provider, secret) {
        return Err(OrchestraError::Configuration(format!(
            "{} keys start with `{}` and are at least {MIN_SECRET_LEN} characters long",
            provider.label(),
            provider.key_prefix()
        )));
    }
    let summary = vault.store(tenant_id, provider, secret, label).await?;
    Ok(AddedCredential {
        summary,
        masked: mask_secret(secret),
    })
}

pub fn print_added(added: &AddedCredential, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(added).unwrap_or_else(|_| "{}".to_string())
        );
        return;
    }
    println!(
        "{} {} credential {} ({})",
        "stored".green().bold(),
        added.summary.provider.label(),
        added.masked,
        added.summary.id
    );
}

pub fn print_list(credentials: &[CredentialSummary], json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(credentials).unwrap_or_else(|_| "[]".to_string())
        );
        return;
    }
    if credentials.is_empty() {
        println!("{}", "no credentials stored".dimmed());
        return;
    }
    for credential in credentials {
        let last_used = credential
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{:<38} {:<12} {:<20} last used {}",
            credential.id.as_str(),
            credential.provider.as_str().bold(),
            credential.label.as_deref().unwrap_or("-"),
            last_used
        );
    }
}

/// Delete one of the tenant's credentials. Returns whether it existed.
pub async fn remove(
    vault: &CredentialVault,
    tenant_id: &TenantId,
    id: &str,
) -> Result<bool, OrchestraError> {
    vault.delete(tenant_id, &CredentialId::from(id)).await
}
