// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `orchestra providers` command implementation.

use colored::Colorize;
use orchestra_core::{OrchestraError, ProviderKind, TenantId};
use orchestra_dispatch::Orchestrator;
use serde::Serialize;
use strum::IntoEnumIterator;

/// One row of the provider table.
#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub id: &'static str,
    pub label: &'static str,
    pub key_prefix: &'static str,
    /// Whether `generate` can target this provider.
    pub dispatchable: bool,
    pub default_model: Option<String>,
    /// Whether the tenant has a stored credential.
    pub configured: bool,
}

/// Every known provider with the tenant's configuration status.
pub async fn list(
    orchestrator: &Orchestrator,
    tenant_id: &TenantId,
) -> Result<Vec<ProviderStatus>, OrchestraError> {
    let configured = orchestrator.vault().configured_providers(tenant_id).await?;
    Ok(ProviderKind::iter()
        .map(|kind| {
            let endpoint = orchestrator.registry().endpoint(kind);
            ProviderStatus {
                id: kind.as_str(),
                label: kind.label(),
                key_prefix: kind.key_prefix(),
                dispatchable: endpoint.is_some(),
                default_model: endpoint.map(|e| e.default_model.clone()),
                configured: configured.contains(&kind),
            }
        })
        .collect())
}

pub fn print(statuses: &[ProviderStatus], json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(statuses).unwrap_or_else(|_| "[]".to_string())
        );
        return;
    }
    for status in statuses {
        let marker = if status.configured {
            "configured".green()
        } else {
            "missing".yellow()
        };
        println!(
            "{:<12} {:<12} {:<8} {:<28} {}",
            status.id.bold(),
            status.label,
            status.key_prefix,
            status.default_model.as_deref().unwrap_or("(credential only)"),
            marker
        );
    }
}

#[cfg(test)]
mod tests {
    use orchestra_test_utils::TestHarness;

    use super::*;

    #[tokio::test]
    async fn marks_configured_and_credential_only_providers() {
        let harness = TestHarness::new().await.unwrap();
        harness
            .add_credential("tenant-a", ProviderKind::Perplexity, "pplx-0123456789abcdef")
            .await
            .unwrap();

        let statuses = list(&harness.orchestrator, &TenantId::from("tenant-a"))
            .await
            .unwrap();

        assert_eq!(statuses.len(), 6);
        let perplexity = statuses.iter().find(|s| s.id == "perplexity").unwrap();
        assert!(perplexity.configured);
        assert_eq!(perplexity.default_model.as_deref(), Some("sonar"));
        let github = statuses.iter().find(|s| s.id == "github").unwrap();
        assert!(!github.dispatchable);
        assert!(!github.configured);
        assert!(statuses.iter().filter(|s| s.configured).count() == 1);
    }
}
