// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter registry and response normalization.
//!
//! Five providers share three wire formats:
//!
//! | provider   | wire format        | auth              |
//! |------------|--------------------|-------------------|
//! | OpenAI     | chat completions   | bearer            |
//! | xAI        | chat completions   | bearer            |
//! | Perplexity | chat completions   | bearer            |
//! | Anthropic  | messages           | `x-api-key`       |
//! | Gemini     | generate content   | `x-goog-api-key`  |
//!
//! Every outcome, including transport faults, is normalized into
//! [`orchestra_core::ProviderResult`].

pub mod adapter;
pub mod http;
pub mod pricing;
pub mod redact;
pub mod registry;
pub mod wire;

pub use adapter::RemoteAdapter;
pub use registry::{AdapterRegistry, AdapterSettings, ProviderEndpoint, WireFormat};
