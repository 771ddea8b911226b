// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the vault, the stores, and the provider adapters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Identifier of the tenant (user or organisation) that owns credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TenantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Opaque identifier of a stored credential record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialId(pub String);

impl CredentialId {
    /// Generates a fresh random (UUID v4) identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CredentialId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The closed set of providers a credential can belong to.
///
/// Parsing is case-insensitive and accepts `gemini` as an alias for
/// `google`. `GitHub` credentials can be stored but are not dispatchable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Xai,
    Perplexity,
    GitHub,
    #[strum(to_string = "google", serialize = "gemini")]
    #[serde(alias = "gemini")]
    Google,
}

impl ProviderKind {
    /// Stable lowercase identifier, as persisted in the store.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Xai => "xAI / Grok",
            Self::Perplexity => "Perplexity",
            Self::GitHub => "GitHub",
            Self::Google => "Google AI",
        }
    }

    /// Literal prefix every well-formed secret for this provider starts with.
    pub fn key_prefix(self) -> &'static str {
        match self {
            Self::OpenAi => "sk-",
            Self::Anthropic => "sk-ant-",
            Self::Xai => "xai-",
            Self::Perplexity => "pplx-",
            Self::GitHub => "ghp_",
            Self::Google => "AI",
        }
    }
}

/// A persisted, encrypted credential. The secret only exists as ciphertext.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRecord {
    pub id: CredentialId,
    pub tenant_id: TenantId,
    pub provider: ProviderKind,
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub auth_tag: Vec<u8>,
    pub label: Option<String>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input to [`crate::CredentialStore::create_record`]. The store assigns the
/// id and creation timestamp.
#[derive(Debug, Clone)]
pub struct NewCredentialRecord {
    pub tenant_id: TenantId,
    pub provider: ProviderKind,
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub auth_tag: Vec<u8>,
    pub label: Option<String>,
}

/// Replacement sealed material (and resolved label) for an existing record.
#[derive(Debug, Clone)]
pub struct CredentialUpdate {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub auth_tag: Vec<u8>,
    pub label: Option<String>,
}

/// Display-safe view of a credential record. Never carries ciphertext.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialSummary {
    pub id: CredentialId,
    pub provider: ProviderKind,
    pub label: Option<String>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&CredentialRecord> for CredentialSummary {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            id: record.id.clone(),
            provider: record.provider,
            label: record.label.clone(),
            last_used_at: record.last_used_at,
            created_at: record.created_at,
        }
    }
}

/// Speaker of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One prior turn of conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A single generation request, independent of provider wire format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    /// `None` or empty selects the provider's default model.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    /// The requested model, or `default` when none (or an empty one) was given.
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.model.as_deref() {
            Some(m) if !m.trim().is_empty() => m,
            _ => default,
        }
    }
}

/// Token counters and estimated cost of one call. Missing counters are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_estimate_usd: f64,
}

/// Why a provider call did not produce content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureKind {
    /// No credential is configured for the provider.
    MissingCredential,
    /// The provider answered with a non-2xx status.
    Remote { status: u16 },
    /// Connection, TLS, or timeout failure.
    Transport,
    /// A 2xx response whose body could not be decoded.
    MalformedResponse,
}

/// Normalized outcome of one provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProviderResult {
    Success { content: String, usage: TokenUsage },
    Failure { kind: FailureKind, message: String },
}

impl ProviderResult {
    pub fn success(content: impl Into<String>, usage: TokenUsage) -> Self {
        Self::Success {
            content: content.into(),
            usage,
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Success { content, .. } => Some(content),
            Self::Failure { .. } => None,
        }
    }

    pub fn usage(&self) -> Option<&TokenUsage> {
        match self {
            Self::Success { usage, .. } => Some(usage),
            Self::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }

    pub fn failure_kind(&self) -> Option<&FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn provider_kind_display_and_parse_round_trip() {
        for kind in ProviderKind::iter() {
            let parsed = ProviderKind::from_str(&kind.to_string()).expect("should parse back");
            assert_eq!(kind, parsed);
        }
        assert_eq!(ProviderKind::OpenAi.to_string(), "openai");
        assert_eq!(ProviderKind::GitHub.as_str(), "github");
    }

    #[test]
    fn provider_kind_accepts_gemini_alias_and_any_case() {
        assert_eq!(ProviderKind::from_str("gemini").unwrap(), ProviderKind::Google);
        assert_eq!(ProviderKind::from_str("Gemini").unwrap(), ProviderKind::Google);
        assert_eq!(ProviderKind::from_str("OpenAI").unwrap(), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::Google.to_string(), "google");
        assert!(ProviderKind::from_str("mistral").is_err());
    }

    #[test]
    fn provider_kind_serde_uses_lowercase_ids() {
        let json = serde_json::to_string(&ProviderKind::Xai).unwrap();
        assert_eq!(json, "\"xai\"");
        let parsed: ProviderKind = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(parsed, ProviderKind::Google);
    }

    #[test]
    fn model_or_falls_back_on_missing_or_blank_model() {
        let req = GenerationRequest::new("hi");
        assert_eq!(req.model_or("gpt-4o"), "gpt-4o");
        let req = GenerationRequest::new("hi").with_model("  ");
        assert_eq!(req.model_or("gpt-4o"), "gpt-4o");
        let req = GenerationRequest::new("hi").with_model("gpt-4o-mini");
        assert_eq!(req.model_or("gpt-4o"), "gpt-4o-mini");
    }

    #[test]
    fn provider_result_accessors() {
        let ok = ProviderResult::success("hello", TokenUsage::default());
        assert!(ok.is_success());
        assert_eq!(ok.content(), Some("hello"));
        assert_eq!(ok.error_message(), None);

        let err = ProviderResult::failure(FailureKind::Remote { status: 401 }, "bad key");
        assert!(!err.is_success());
        assert_eq!(err.error_message(), Some("bad key"));
        assert_eq!(err.failure_kind(), Some(&FailureKind::Remote { status: 401 }));
    }

    #[test]
    fn provider_result_serializes_with_status_tag() {
        let err = ProviderResult::failure(FailureKind::Transport, "connection refused");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["status"], "failure");
        assert_eq!(value["kind"]["type"], "transport");
        assert_eq!(value["message"], "connection refused");
    }
}
