// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams of the workspace.
//!
//! Both traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod provider;
pub mod storage;

pub use provider::ProviderAdapter;
pub use storage::CredentialStore;
