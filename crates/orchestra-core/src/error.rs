// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Orchestra.
//!
//! Provider call failures are not errors: they are captured in
//! [`crate::types::ProviderResult::Failure`] so a caller driving several
//! providers can collect partial successes. Only faults that make a whole
//! request meaningless (configuration, integrity, unknown provider, storage)
//! are represented here.

use thiserror::Error;

/// The primary error type used across the vault, stores, and dispatch.
#[derive(Debug, Error)]
pub enum OrchestraError {
    /// Missing or unusable configuration, including an absent master secret.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A sealed credential failed authentication and was not released.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// The provider identifier does not name a dispatchable provider.
    #[error("unsupported provider: {provider}")]
    UnsupportedProvider { provider: String },

    /// Durable store failure (connection, query, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The store refused to create a second record for the same pair.
    #[error("credential already exists for tenant {tenant_id} and provider {provider}")]
    CredentialConflict { tenant_id: String, provider: String },

    /// CSPRNG or cipher setup failure.
    #[error("cryptography error: {0}")]
    Crypto(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OrchestraError {
    /// Wraps any error as a storage failure.
    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage { source: err.into() }
    }
}
