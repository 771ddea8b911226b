// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared HTTP plumbing: client construction and response normalization.
//!
//! [`send_json`] is the single place where transport faults, non-2xx statuses
//! and undecodable bodies become [`ProviderResult::Failure`] values. There is
//! no retry.

use std::time::Duration;

use orchestra_core::{FailureKind, OrchestraError, ProviderResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::redact::redact;

/// Build the shared HTTP client used by every adapter.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, OrchestraError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("orchestra/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| OrchestraError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Error envelope shared by all five providers: `{"error": {"message": ...}}`,
/// occasionally `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Object { message: Option<String> },
    Text(String),
}

/// Extract the remote error message from a non-2xx body, if present.
pub fn remote_error_message(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    let message = match envelope.error? {
        ErrorDetail::Object { message } => message?,
        ErrorDetail::Text(text) => text,
    };
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}

/// Send a prepared request and decode a 2xx JSON body into `T`.
///
/// `provider` is the display name used in messages; `secret` is scrubbed from
/// every failure message.
pub async fn send_json<T: DeserializeOwned>(
    provider: &str,
    request: reqwest::RequestBuilder,
    secret: &str,
) -> Result<T, ProviderResult> {
    let response = request.send().await.map_err(|e| {
        ProviderResult::failure(
            FailureKind::Transport,
            redact(&format!("{provider} request failed: {e}"), &[secret]),
        )
    })?;

    let status = response.status();
    debug!(provider, status = %status, "provider response received");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message =
            remote_error_message(&body).unwrap_or_else(|| format!("{provider} API error"));
        return Err(ProviderResult::failure(
            FailureKind::Remote {
                status: status.as_u16(),
            },
            redact(&message, &[secret]),
        ));
    }

    let bytes = response.bytes().await.map_err(|e| {
        ProviderResult::failure(
            FailureKind::Transport,
            redact(&format!("{provider} response could not be read: {e}"), &[secret]),
        )
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        ProviderResult::failure(
            FailureKind::MalformedResponse,
            format!("{provider} returned an unreadable response: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_error_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(
            remote_error_message(body).as_deref(),
            Some("Incorrect API key provided")
        );
    }

    #[test]
    fn extracts_string_error() {
        assert_eq!(
            remote_error_message(r#"{"error": "rate limited"}"#).as_deref(),
            Some("rate limited")
        );
    }

    #[test]
    fn missing_or_blank_message_is_none() {
        assert_eq!(remote_error_message(r#"{"error": {"code": 500}}"#), None);
        assert_eq!(remote_error_message(r#"{"error": {"message": "  "}}"#), None);
        assert_eq!(remote_error_message(r#"{"detail": "nope"}"#), None);
        assert_eq!(remote_error_message("<html>bad gateway</html>"), None);
        assert_eq!(remote_error_message(""), None);
    }
}
