// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider identifier → endpoint resolution.
//!
//! The registry is an explicit value built from configuration, never global
//! state, so tests can point any provider at a local mock server.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use orchestra_config::model::{DispatchConfig, ProvidersConfig};
use orchestra_core::{OrchestraError, ProviderKind};
use secrecy::SecretString;
use tracing::debug;

use crate::adapter::RemoteAdapter;
use crate::http;

/// Wire format spoken by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    ChatCompletions,
    AnthropicMessages,
    GeminiGenerateContent,
}

/// Where and how to call one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    /// Credential provider whose secret authenticates the call.
    pub kind: ProviderKind,
    /// Name used in user-facing messages.
    pub display_name: String,
    pub wire: WireFormat,
    pub base_url: String,
    pub default_model: String,
}

impl ProviderEndpoint {
    /// Built-in endpoint for a provider, or `None` if it is credential-only.
    pub fn default_for(kind: ProviderKind) -> Option<Self> {
        let (display_name, wire, base_url, default_model) = match kind {
            ProviderKind::OpenAi => (
                "OpenAI",
                WireFormat::ChatCompletions,
                "https://api.openai.com/v1",
                "gpt-4o",
            ),
            ProviderKind::Anthropic => (
                "Anthropic",
                WireFormat::AnthropicMessages,
                "https://api.anthropic.com",
                "claude-sonnet-4-20250514",
            ),
            ProviderKind::Xai => (
                "xAI",
                WireFormat::ChatCompletions,
                "https://api.x.ai/v1",
                "grok-2",
            ),
            ProviderKind::Perplexity => (
                "Perplexity",
                WireFormat::ChatCompletions,
                "https://api.perplexity.ai",
                "sonar",
            ),
            ProviderKind::Google => (
                "Gemini",
                WireFormat::GeminiGenerateContent,
                "https://generativelanguage.googleapis.com/v1beta",
                "gemini-2.0-flash",
            ),
            ProviderKind::GitHub => return None,
        };
        Some(Self {
            kind,
            display_name: display_name.to_string(),
            wire,
            base_url: base_url.to_string(),
            default_model: default_model.to_string(),
        })
    }
}

/// Settings shared by all adapters built from one registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterSettings {
    pub anthropic_max_tokens: u32,
    pub anthropic_version: String,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        let dispatch = DispatchConfig::default();
        Self {
            anthropic_max_tokens: dispatch.anthropic_max_tokens,
            anthropic_version: dispatch.anthropic_version,
        }
    }
}

/// Maps provider identifiers to endpoints and builds one-shot adapters.
#[derive(Debug, Clone)]
pub struct AdapterRegistry {
    endpoints: BTreeMap<ProviderKind, ProviderEndpoint>,
    client: reqwest::Client,
    settings: AdapterSettings,
}

impl AdapterRegistry {
    /// Registry with every built-in endpoint.
    pub fn with_defaults(client: reqwest::Client, settings: AdapterSettings) -> Self {
        let endpoints = [
            ProviderKind::OpenAi,
            ProviderKind::Anthropic,
            ProviderKind::Xai,
            ProviderKind::Perplexity,
            ProviderKind::Google,
        ]
        .into_iter()
        .filter_map(ProviderEndpoint::default_for)
        .map(|endpoint| (endpoint.kind, endpoint))
        .collect();
        Self {
            endpoints,
            client,
            settings,
        }
    }

    /// Built-in endpoints with configured overrides applied.
    pub fn from_config(
        dispatch: &DispatchConfig,
        providers: &ProvidersConfig,
    ) -> Result<Self, OrchestraError> {
        let client = http::build_client(Duration::from_secs(dispatch.request_timeout_secs))?;
        let settings = AdapterSettings {
            anthropic_max_tokens: dispatch.anthropic_max_tokens,
            anthropic_version: dispatch.anthropic_version.clone(),
        };
        let mut registry = Self::with_defaults(client, settings);

        for (name, overrides) in providers.iter() {
            let kind = ProviderKind::from_str(name).map_err(|_| {
                OrchestraError::Configuration(format!("unknown provider table `{name}`"))
            })?;
            if let Some(endpoint) = registry.endpoints.get_mut(&kind) {
                if let Some(base_url) = &overrides.base_url {
                    debug!(provider = name, base_url = %base_url, "overriding provider base URL");
                    endpoint.base_url = base_url.clone();
                }
                if let Some(model) = &overrides.default_model {
                    endpoint.default_model = model.clone();
                }
            }
        }
        Ok(registry)
    }

    /// Add or replace an endpoint.
    pub fn with_endpoint(mut self, endpoint: ProviderEndpoint) -> Self {
        self.endpoints.insert(endpoint.kind, endpoint);
        self
    }

    /// Resolve a provider identifier (case-insensitive, `gemini` = `google`).
    ///
    /// Unknown identifiers and credential-only providers are unsupported.
    pub fn resolve(&self, provider: &str) -> Result<&ProviderEndpoint, OrchestraError> {
        ProviderKind::from_str(provider.trim())
            .ok()
            .and_then(|kind| self.endpoints.get(&kind))
            .ok_or_else(|| OrchestraError::UnsupportedProvider {
                provider: provider.to_string(),
            })
    }

    pub fn endpoint(&self, kind: ProviderKind) -> Option<&ProviderEndpoint> {
        self.endpoints.get(&kind)
    }

    /// Dispatchable endpoints in a stable order.
    pub fn endpoints(&self) -> impl Iterator<Item = &ProviderEndpoint> {
        self.endpoints.values()
    }

    /// Build a one-shot adapter that owns `secret` until it is dropped.
    pub fn adapter(&self, endpoint: &ProviderEndpoint, secret: Option<SecretString>) -> RemoteAdapter {
        RemoteAdapter::new(
            self.client.clone(),
            endpoint.clone(),
            self.settings.clone(),
            secret,
        )
    }
}
