// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-tenant credential vault.
//!
//! Provider secrets are sealed with AES-256-GCM under a key derived from a
//! single master secret (PBKDF2-HMAC-SHA512). The key is recomputed for every
//! operation and never persisted. [`CredentialVault`] owns the record
//! lifecycle on top of any [`orchestra_core::CredentialStore`].

pub mod cipher;
pub mod crypto;
pub mod format;
pub mod kdf;
pub mod master;
pub mod vault;

pub use cipher::VaultCipher;
pub use format::{mask_secret, validate_format, validate_format_for};
pub use master::master_secret_from_env;
pub use vault::CredentialVault;
