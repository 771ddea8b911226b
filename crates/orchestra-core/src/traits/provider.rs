// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for generation provider integrations.

use async_trait::async_trait;

use crate::types::{GenerationRequest, ProviderResult};

/// One-shot adapter for a remote generation endpoint.
///
/// An adapter owns the resolved secret for its own lifetime only; a new
/// adapter is built for every dispatch. `call` never returns an error: every
/// remote or transport fault is normalized into [`ProviderResult::Failure`].
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Human-readable provider name, used in messages.
    fn name(&self) -> &str;

    /// Performs the remote call and normalizes its outcome.
    async fn call(&self, request: &GenerationRequest) -> ProviderResult;
}
