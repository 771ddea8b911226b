// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full generation stack: a credential store
//! (in-memory or temp SQLite) behind a [`FlakyStore`], a vault with a fixed
//! master secret, and a registry whose five endpoints all point at one
//! `wiremock` server.

use std::sync::Arc;

use orchestra_config::model::StorageConfig;
use orchestra_core::{
    CredentialStore, GenerationRequest, OrchestraError, ProviderKind, ProviderResult, TenantId,
};
use orchestra_dispatch::Orchestrator;
use orchestra_providers::{AdapterRegistry, AdapterSettings, ProviderEndpoint, WireFormat};
use orchestra_storage::{MemoryCredentialStore, SqliteCredentialStore};
use orchestra_vault::{CredentialVault, VaultCipher};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::flaky_store::FlakyStore;

/// Master secret every harness vault is keyed with.
pub const TEST_MASTER_SECRET: &str = "orchestra-test-master-secret";

const DISPATCHABLE: [ProviderKind; 5] = [
    ProviderKind::OpenAi,
    ProviderKind::Anthropic,
    ProviderKind::Xai,
    ProviderKind::Perplexity,
    ProviderKind::Google,
];

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    sqlite: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self { sqlite: false }
    }

    /// Back the vault with a SQLite database in a temp directory.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Build the harness and start its mock server.
    pub async fn build(self) -> Result<TestHarness, OrchestraError> {
        let (inner, temp_dir) = if self.sqlite {
            let temp_dir =
                tempfile::TempDir::new().map_err(|e| OrchestraError::Storage { source: e.into() })?;
            let store = SqliteCredentialStore::new(StorageConfig {
                database_path: temp_dir.path().join("test.db").to_string_lossy().to_string(),
                wal_mode: true,
            });
            store.initialize().await?;
            let store: Arc<dyn CredentialStore> = Arc::new(store);
            (store, Some(temp_dir))
        } else {
            let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
            (store, None)
        };
        let store = Arc::new(FlakyStore::new(inner));

        let cipher = VaultCipher::with_default_salt(SecretString::from(
            TEST_MASTER_SECRET.to_string(),
        ))?;
        let vault = Arc::new(CredentialVault::new(store.clone(), cipher));

        let server = MockServer::start().await;
        let mut registry =
            AdapterRegistry::with_defaults(reqwest::Client::new(), AdapterSettings::default());
        for kind in DISPATCHABLE {
            if let Some(mut endpoint) = ProviderEndpoint::default_for(kind) {
                endpoint.base_url = server.uri();
                registry = registry.with_endpoint(endpoint);
            }
        }

        Ok(TestHarness {
            orchestrator: Orchestrator::new(vault.clone(), registry),
            vault,
            store,
            server,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete generation stack against a local mock server.
pub struct TestHarness {
    /// Orchestrator wired to `vault` and the mock server.
    pub orchestrator: Orchestrator,
    pub vault: Arc<CredentialVault>,
    /// Fault switches for the underlying store.
    pub store: Arc<FlakyStore>,
    /// Every provider endpoint resolves to this server.
    pub server: MockServer,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// In-memory harness with default options.
    pub async fn new() -> Result<Self, OrchestraError> {
        Self::builder().build().await
    }

    /// Store `secret` for `tenant`/`provider` through the vault.
    pub async fn add_credential(
        &self,
        tenant: &str,
        provider: ProviderKind,
        secret: &str,
    ) -> Result<(), OrchestraError> {
        self.vault
            .store(&TenantId::from(tenant), provider, secret, None)
            .await
            .map(|_| ())
    }

    /// Dispatch a single-turn prompt.
    pub async fn generate(
        &self,
        tenant: &str,
        provider: &str,
        prompt: &str,
    ) -> Result<ProviderResult, OrchestraError> {
        self.orchestrator
            .generate(&TenantId::from(tenant), provider, &GenerationRequest::new(prompt))
            .await
    }

    /// Answer every request in `provider`'s wire format with `content`.
    pub async fn mount_success(&self, provider: ProviderKind, content: &str) {
        let Some(endpoint) = ProviderEndpoint::default_for(provider) else {
            return;
        };
        let (mock, body) = match endpoint.wire {
            WireFormat::ChatCompletions => (
                Mock::given(method("POST")).and(path("/chat/completions")),
                json!({
                    "choices": [{"message": {"role": "assistant", "content": content}}],
                    "usage": {"prompt_tokens": 10, "completion_tokens": 5}
                }),
            ),
            WireFormat::AnthropicMessages => (
                Mock::given(method("POST")).and(path("/v1/messages")),
                json!({
                    "content": [{"type": "text", "text": content}],
                    "usage": {"input_tokens": 10, "output_tokens": 5}
                }),
            ),
            WireFormat::GeminiGenerateContent => (
                Mock::given(method("POST")).and(path_regex(r"^/models/[^/]+:generateContent$")),
                json!({
                    "candidates": [{"content": {"parts": [{"text": content}]}}],
                    "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5}
                }),
            ),
        };
        mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer every request with `status` and an error envelope.
    pub async fn mount_error(&self, status: u16, message: Option<&str>) {
        let body = match message {
            Some(message) => json!({"error": {"message": message}}),
            None => json!({}),
        };
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the mock server has received.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
