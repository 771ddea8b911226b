// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Orchestra.
//!
//! This crate provides the error taxonomy, the credential and generation
//! domain types, and the two seams the rest of the workspace plugs into:
//! [`CredentialStore`] (durable persistence of encrypted credential records)
//! and [`ProviderAdapter`] (one outbound call to a generation provider).

pub mod error;
pub mod traits;
pub mod types;

pub use error::OrchestraError;
pub use types::{
    ChatMessage, ChatRole, CredentialId, CredentialRecord, CredentialSummary, CredentialUpdate,
    FailureKind, GenerationRequest, NewCredentialRecord, ProviderKind, ProviderResult, TenantId,
    TokenUsage,
};

pub use traits::{CredentialStore, ProviderAdapter};
