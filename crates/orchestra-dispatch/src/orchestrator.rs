// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use orchestra_core::{GenerationRequest, OrchestraError, ProviderAdapter, ProviderResult, TenantId};
use orchestra_providers::AdapterRegistry;
use orchestra_vault::CredentialVault;
use tracing::{info, instrument, warn};

/// Result of one provider within a [`Orchestrator::generate_many`] batch.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// The identifier as the caller supplied it.
    pub provider: String,
    pub result: Result<ProviderResult, OrchestraError>,
}

/// Joins the credential vault to the adapter registry.
///
/// Holds no per-provider state: every call re-resolves the credential, so a
/// rotation or deletion takes effect on the next request.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    vault: Arc<CredentialVault>,
    registry: AdapterRegistry,
}

impl Orchestrator {
    pub fn new(vault: Arc<CredentialVault>, registry: AdapterRegistry) -> Self {
        Self { vault, registry }
    }

    pub fn vault(&self) -> &CredentialVault {
        &self.vault
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Run one generation for `tenant_id` against `provider`.
    ///
    /// `Err` is reserved for unsupported providers and vault faults (store
    /// unavailable, undecryptable record). Everything that happens at the
    /// provider, including a missing credential, is an `Ok(ProviderResult)`.
    #[instrument(skip(self, tenant_id, request), fields(tenant_id = %tenant_id))]
    pub async fn generate(
        &self,
        tenant_id: &TenantId,
        provider: &str,
        request: &GenerationRequest,
    ) -> Result<ProviderResult, OrchestraError> {
        let endpoint = self.registry.resolve(provider).inspect_err(|_| {
            warn!(provider, "rejected unsupported provider");
        })?;

        let secret = self.vault.fetch(tenant_id, endpoint.kind).await?;
        let adapter = self.registry.adapter(endpoint, secret);

        let started = Instant::now();
        let result = adapter.call(request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        drop(adapter);

        match &result {
            ProviderResult::Success { usage, .. } => info!(
                provider = %endpoint.kind,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                cost_usd = usage.cost_estimate_usd,
                elapsed_ms,
                "generation succeeded"
            ),
            ProviderResult::Failure { kind, .. } => info!(
                provider = %endpoint.kind,
                failure = ?kind,
                elapsed_ms,
                "generation failed"
            ),
        }
        Ok(result)
    }

    /// Run the same request against several providers concurrently.
    ///
    /// Outcomes are returned in input order; one provider failing never
    /// affects the others.
    pub async fn generate_many(
        &self,
        tenant_id: &TenantId,
        providers: &[&str],
        request: &GenerationRequest,
    ) -> Vec<DispatchOutcome> {
        let calls = providers.iter().map(|provider| async move {
            DispatchOutcome {
                provider: (*provider).to_string(),
                result: self.generate(tenant_id, provider, request).await,
            }
        });
        join_all(calls).await
    }
}

#[cfg(test)]
mod tests {
    use orchestra_core::{FailureKind, ProviderKind};
    use orchestra_providers::{AdapterSettings, ProviderEndpoint};
    use orchestra_storage::MemoryCredentialStore;
    use orchestra_vault::VaultCipher;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const OPENAI_KEY: &str = "sk-test-0123456789abcdefghij";

    fn orchestrator(server_uri: &str) -> Orchestrator {
        let cipher = VaultCipher::with_default_salt(SecretString::from("unit-test-master-secret".to_string()))
            .unwrap();
        let vault = CredentialVault::new(Arc::new(MemoryCredentialStore::new()), cipher);
        let mut registry =
            AdapterRegistry::with_defaults(reqwest::Client::new(), AdapterSettings::default());
        for kind in [ProviderKind::OpenAi, ProviderKind::Anthropic] {
            let mut endpoint = ProviderEndpoint::default_for(kind).unwrap();
            endpoint.base_url = server_uri.to_string();
            registry = registry.with_endpoint(endpoint);
        }
        Orchestrator::new(Arc::new(vault), registry)
    }

    fn tenant() -> TenantId {
        TenantId::from("tenant-a")
    }

    #[tokio::test]
    async fn uses_the_stored_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", format!("Bearer {OPENAI_KEY}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "hi"}}],
                "usage": {"prompt_tokens": 1, "completion_tokens": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server.uri());
        orchestrator
            .vault()
            .store(&tenant(), ProviderKind::OpenAi, OPENAI_KEY, None)
            .await
            .unwrap();

        let result = orchestrator
            .generate(&tenant(), "openai", &GenerationRequest::new("hello"))
            .await
            .unwrap();
        assert_eq!(result.content(), Some("hi"));
    }

    #[tokio::test]
    async fn missing_anthropic_credential_is_a_failure_value() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = orchestrator(&server.uri())
            .generate(&tenant(), "anthropic", &GenerationRequest::new("hello"))
            .await
            .unwrap();

        assert_eq!(result.failure_kind(), Some(&FailureKind::MissingCredential));
        assert!(result.error_message().unwrap().contains("Anthropic API key not configured"));
    }

    #[tokio::test]
    async fn unknown_provider_is_an_error() {
        let err = orchestrator("http://127.0.0.1:9")
            .generate(&tenant(), "mistral", &GenerationRequest::new("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestraError::UnsupportedProvider { provider } if provider == "mistral"));
    }

    #[tokio::test]
    async fn generate_many_keeps_input_order_and_isolates_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "from openai"}}]
            })))
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server.uri());
        orchestrator
            .vault()
            .store(&tenant(), ProviderKind::OpenAi, OPENAI_KEY, None)
            .await
            .unwrap();

        let outcomes = orchestrator
            .generate_many(
                &tenant(),
                &["openai", "bogus", "anthropic"],
                &GenerationRequest::new("hello"),
            )
            .await;

        let providers: Vec<_> = outcomes.iter().map(|o| o.provider.as_str()).collect();
        assert_eq!(providers, ["openai", "bogus", "anthropic"]);
        assert_eq!(
            outcomes[0].result.as_ref().unwrap().content(),
            Some("from openai")
        );
        assert!(matches!(
            outcomes[1].result,
            Err(OrchestraError::UnsupportedProvider { .. })
        ));
        assert_eq!(
            outcomes[2].result.as_ref().unwrap().failure_kind(),
            Some(&FailureKind::MissingCredential)
        );
    }
}
