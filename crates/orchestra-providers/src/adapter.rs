// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The one adapter type, dispatching on the endpoint's wire format.

use async_trait::async_trait;
use orchestra_core::{FailureKind, GenerationRequest, ProviderAdapter, ProviderResult, TokenUsage};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::pricing;
use crate::registry::{AdapterSettings, ProviderEndpoint, WireFormat};
use crate::wire::{anthropic, chat_completions, gemini, Completion};

/// Adapter bound to one endpoint and, optionally, one resolved secret.
///
/// Built per dispatch and dropped afterwards, so a rotated or revoked
/// credential is never reused.
pub struct RemoteAdapter {
    client: reqwest::Client,
    endpoint: ProviderEndpoint,
    settings: AdapterSettings,
    secret: Option<SecretString>,
}

impl std::fmt::Debug for RemoteAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteAdapter")
            .field("endpoint", &self.endpoint)
            .field("has_secret", &self.secret.is_some())
            .finish_non_exhaustive()
    }
}

impl RemoteAdapter {
    pub fn new(
        client: reqwest::Client,
        endpoint: ProviderEndpoint,
        settings: AdapterSettings,
        secret: Option<SecretString>,
    ) -> Self {
        Self {
            client,
            endpoint,
            settings,
            secret,
        }
    }

    fn missing_credential(&self) -> ProviderResult {
        ProviderResult::failure(
            FailureKind::MissingCredential,
            format!(
                "{} API key not configured. Add a `{}` credential in Settings > API Keys.",
                self.endpoint.display_name, self.endpoint.kind
            ),
        )
    }

    async fn dispatch(
        &self,
        secret: &str,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<Completion, ProviderResult> {
        let endpoint = &self.endpoint;
        match endpoint.wire {
            WireFormat::ChatCompletions => {
                chat_completions::call(
                    &self.client,
                    &endpoint.display_name,
                    &endpoint.base_url,
                    secret,
                    model,
                    request,
                )
                .await
            }
            WireFormat::AnthropicMessages => {
                anthropic::call(
                    &self.client,
                    &endpoint.display_name,
                    &endpoint.base_url,
                    &self.settings.anthropic_version,
                    self.settings.anthropic_max_tokens,
                    secret,
                    model,
                    request,
                )
                .await
            }
            WireFormat::GeminiGenerateContent => {
                gemini::call(
                    &self.client,
                    &endpoint.display_name,
                    &endpoint.base_url,
                    secret,
                    model,
                    request,
                )
                .await
            }
        }
    }
}

#[async_trait]
impl ProviderAdapter for RemoteAdapter {
    fn name(&self) -> &str {
        &self.endpoint.display_name
    }

    async fn call(&self, request: &GenerationRequest) -> ProviderResult {
        let Some(secret) = &self.secret else {
            return self.missing_credential();
        };
        let model = request.model_or(&self.endpoint.default_model);
        debug!(provider = %self.endpoint.kind, model, "calling provider");

        match self.dispatch(secret.expose_secret(), model, request).await {
            Ok(completion) => {
                let cost_estimate_usd = pricing::estimate_cost(
                    self.endpoint.kind,
                    model,
                    completion.input_tokens,
                    completion.output_tokens,
                );
                ProviderResult::success(
                    completion.content,
                    TokenUsage {
                        input_tokens: completion.input_tokens,
                        output_tokens: completion.output_tokens,
                        cost_estimate_usd,
                    },
                )
            }
            Err(failure) => failure,
        }
    }
}
