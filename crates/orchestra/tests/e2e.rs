// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the vault → registry → adapter pipeline.
//!
//! Each test builds an isolated TestHarness (own store, own mock server).

use orchestra_core::{FailureKind, OrchestraError, ProviderKind, TenantId};
use orchestra_test_utils::TestHarness;
use secrecy::ExposeSecret;

const TENANT: &str = "tenant-e2e";

// ---- Dispatch with stored credentials ----

#[tokio::test]
async fn all_five_providers_dispatch_with_stored_credentials() {
    for (kind, id, secret) in [
        (ProviderKind::OpenAi, "openai", "sk-openai-0123456789"),
        (ProviderKind::Anthropic, "anthropic", "sk-ant-0123456789"),
        (ProviderKind::Xai, "xai", "xai-0123456789"),
        (ProviderKind::Perplexity, "perplexity", "pplx-0123456789"),
        (ProviderKind::Google, "gemini", "AIza0123456789"),
    ] {
        let harness = TestHarness::new().await.unwrap();
        harness.add_credential(TENANT, kind, secret).await.unwrap();
        harness.mount_success(kind, &format!("hello from {id}")).await;

        let result = harness.generate(TENANT, id, "hi").await.unwrap();
        assert_eq!(result.content(), Some(format!("hello from {id}").as_str()), "{id}");
        let usage = result.usage().unwrap();
        assert_eq!((usage.input_tokens, usage.output_tokens), (10, 5));
    }
}

#[tokio::test]
async fn rotated_credential_is_used_on_the_next_call() {
    let harness = TestHarness::new().await.unwrap();
    harness
        .add_credential(TENANT, ProviderKind::OpenAi, "sk-first-0123456789")
        .await
        .unwrap();
    harness.mount_success(ProviderKind::OpenAi, "ok").await;
    harness.generate(TENANT, "openai", "one").await.unwrap();

    harness
        .add_credential(TENANT, ProviderKind::OpenAi, "sk-second-0123456789")
        .await
        .unwrap();
    harness.generate(TENANT, "openai", "two").await.unwrap();

    let requests = harness.server.received_requests().await.unwrap();
    let auth: Vec<_> = requests
        .iter()
        .map(|r| r.headers.get("authorization").unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(
        auth,
        ["Bearer sk-first-0123456789", "Bearer sk-second-0123456789"]
    );
}

#[tokio::test]
async fn deleted_credential_is_missing_on_the_next_call() {
    let harness = TestHarness::new().await.unwrap();
    let tenant = TenantId::from(TENANT);
    harness
        .add_credential(TENANT, ProviderKind::Xai, "xai-0123456789")
        .await
        .unwrap();
    let id = harness.vault.list(&tenant).await.unwrap()[0].id.clone();
    assert!(harness.vault.delete(&tenant, &id).await.unwrap());

    let result = harness.generate(TENANT, "xai", "hi").await.unwrap();
    assert_eq!(result.failure_kind(), Some(&FailureKind::MissingCredential));
    assert_eq!(harness.request_count().await, 0);
}

// ---- Failure normalization ----

#[tokio::test]
async fn missing_anthropic_credential_is_actionable() {
    let harness = TestHarness::new().await.unwrap();
    let result = harness.generate(TENANT, "anthropic", "hi").await.unwrap();

    assert!(!result.is_success());
    let message = result.error_message().unwrap();
    assert!(message.contains("Anthropic API key not configured"), "{message}");
    assert!(message.contains("anthropic"));
    assert_eq!(harness.request_count().await, 0);
}

#[tokio::test]
async fn remote_401_message_is_surfaced() {
    let harness = TestHarness::new().await.unwrap();
    harness
        .add_credential(TENANT, ProviderKind::Anthropic, "sk-ant-0123456789")
        .await
        .unwrap();
    harness.mount_error(401, Some("invalid x-api-key")).await;

    let result = harness.generate(TENANT, "anthropic", "hi").await.unwrap();
    assert_eq!(result.failure_kind(), Some(&FailureKind::Remote { status: 401 }));
    assert_eq!(result.error_message(), Some("invalid x-api-key"));
    assert_eq!(harness.request_count().await, 1, "no retry");
}

#[tokio::test]
async fn remote_error_without_message_uses_provider_name() {
    let harness = TestHarness::new().await.unwrap();
    harness
        .add_credential(TENANT, ProviderKind::Google, "AIza0123456789")
        .await
        .unwrap();
    harness.mount_error(500, None).await;

    let result = harness.generate(TENANT, "gemini", "hi").await.unwrap();
    assert_eq!(result.error_message(), Some("Gemini API error"));
}

#[tokio::test]
async fn unsupported_provider_is_an_error_not_a_result() {
    let harness = TestHarness::new().await.unwrap();
    for provider in ["mistral", "github"] {
        let err = harness.generate(TENANT, provider, "hi").await.unwrap_err();
        assert!(matches!(err, OrchestraError::UnsupportedProvider { .. }), "{provider}");
    }
}

// ---- Best-effort bookkeeping and store faults ----

#[tokio::test]
async fn failed_last_used_update_does_not_fail_dispatch() {
    let harness = TestHarness::new().await.unwrap();
    harness
        .add_credential(TENANT, ProviderKind::Perplexity, "pplx-0123456789")
        .await
        .unwrap();
    harness.mount_success(ProviderKind::Perplexity, "still works").await;
    harness.store.set_fail_touch(true);

    let result = harness.generate(TENANT, "perplexity", "hi").await.unwrap();
    assert_eq!(result.content(), Some("still works"));
    assert_eq!(harness.store.touch_attempts(), 1);

    let summary = &harness.vault.list(&TenantId::from(TENANT)).await.unwrap()[0];
    assert!(summary.last_used_at.is_none());
}

#[tokio::test]
async fn unreachable_store_is_a_hard_error() {
    let harness = TestHarness::new().await.unwrap();
    harness.store.set_fail_reads(true);

    let err = harness.generate(TENANT, "openai", "hi").await.unwrap_err();
    assert!(matches!(err, OrchestraError::Storage { .. }));
}

// ---- Upsert races ----

#[tokio::test]
async fn store_recovers_when_a_concurrent_create_wins() {
    let harness = TestHarness::new().await.unwrap();
    let tenant = TenantId::from(TENANT);
    harness.add_credential(TENANT, ProviderKind::Anthropic, "sk-ant-first").await.unwrap();
    let original = harness.vault.list(&tenant).await.unwrap()[0].id.clone();

    harness.store.hide_next_lookup();
    harness.add_credential(TENANT, ProviderKind::Anthropic, "sk-ant-second").await.unwrap();

    let records = harness.vault.list(&tenant).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, original);
    let secret = harness
        .vault
        .fetch(&tenant, ProviderKind::Anthropic)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(secret.expose_secret(), "sk-ant-second");
}

#[tokio::test]
async fn store_recreates_a_record_deleted_during_rotation() {
    let harness = TestHarness::builder().with_sqlite().build().await.unwrap();
    let tenant = TenantId::from(TENANT);
    harness.add_credential(TENANT, ProviderKind::Xai, "xai-first-key").await.unwrap();
    let original = harness.vault.list(&tenant).await.unwrap()[0].id.clone();

    harness.store.vanish_on_next_update();
    harness.add_credential(TENANT, ProviderKind::Xai, "xai-second-key").await.unwrap();

    let records = harness.vault.list(&tenant).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_ne!(records[0].id, original);
    let secret = harness
        .vault
        .fetch(&tenant, ProviderKind::Xai)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(secret.expose_secret(), "xai-second-key");
}

// ---- Durable store ----

#[tokio::test]
async fn sqlite_backed_upsert_keeps_one_record_with_latest_secret() {
    let harness = TestHarness::builder().with_sqlite().build().await.unwrap();
    let tenant = TenantId::from(TENANT);

    harness.add_credential(TENANT, ProviderKind::OpenAi, "sk-a").await.unwrap();
    harness.add_credential(TENANT, ProviderKind::OpenAi, "sk-b").await.unwrap();

    let records = harness.vault.list(&tenant).await.unwrap();
    assert_eq!(records.len(), 1);
    let secret = harness
        .vault
        .fetch(&tenant, ProviderKind::OpenAi)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(secret.expose_secret(), "sk-b");

    let touched = harness.vault.list(&tenant).await.unwrap();
    assert!(touched[0].last_used_at.is_some());
}

#[tokio::test]
async fn generate_many_collects_partial_success() {
    let harness = TestHarness::new().await.unwrap();
    harness
        .add_credential(TENANT, ProviderKind::OpenAi, "sk-0123456789")
        .await
        .unwrap();
    harness.mount_success(ProviderKind::OpenAi, "gpt says hi").await;

    let outcomes = harness
        .orchestrator
        .generate_many(
            &TenantId::from(TENANT),
            &["openai", "anthropic"],
            &orchestra_core::GenerationRequest::new("hi"),
        )
        .await;

    assert_eq!(outcomes[0].result.as_ref().unwrap().content(), Some("gpt says hi"));
    assert_eq!(
        outcomes[1].result.as_ref().unwrap().failure_kind(),
        Some(&FailureKind::MissingCredential)
    );
}
