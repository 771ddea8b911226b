// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display masking and cheap shape checks for provider secrets.

use orchestra_core::ProviderKind;
use strum::IntoEnumIterator;

/// Secrets shorter than this fail [`validate_format`].
pub const MIN_SECRET_LEN: usize = 10;

const MASK: &str = "****";

/// Display-safe form of a secret: `"sk-1****7890"`.
///
/// Secrets of 8 characters or fewer are fully replaced by `"****"`.
/// Never use the output for comparison or storage.
pub fn mask_secret(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 8 {
        return MASK.to_string();
    }
    let head: String = secret.chars().take(4).collect();
    let tail: String = secret.chars().skip(len - 4).collect();
    format!("{head}{MASK}{tail}")
}

/// Sanity check of a secret for a provider identifier.
///
/// `provider` must be an exact stored identifier (`"openai"`, `"google"`).
/// Known providers require their literal key prefix and the minimum length;
/// anything else, aliases and other casings included, only gets the length
/// check.
pub fn validate_format(provider: &str, secret: &str) -> bool {
    match ProviderKind::iter().find(|kind| kind.as_str() == provider) {
        Some(kind) => validate_format_for(kind, secret),
        None => secret.chars().count() >= MIN_SECRET_LEN,
    }
}

pub fn validate_format_for(provider: ProviderKind, secret: &str) -> bool {
    secret.starts_with(provider.key_prefix()) && secret.chars().count() >= MIN_SECRET_LEN
}
