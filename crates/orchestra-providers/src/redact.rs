// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for provider error messages.
//!
//! Two complementary mechanisms:
//! 1. **Regex-based**: known key shapes for every supported provider.
//! 2. **Exact-match**: the secret used for the call being reported.

use std::sync::LazyLock;

use regex::Regex;

/// The redaction placeholder.
pub const REDACTED: &str = "[REDACTED]";

static REDACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Anthropic: sk-ant-api03-...
        r"sk-ant-[a-zA-Z0-9_\-]{20,}",
        // OpenAI style: sk-..., sk-proj-...
        r"sk-[a-zA-Z0-9_\-]{20,}",
        r"xai-[a-zA-Z0-9]{20,}",
        r"pplx-[a-zA-Z0-9]{20,}",
        // Google API keys
        r"AIza[0-9A-Za-z_\-]{30,}",
        r"ghp_[a-zA-Z0-9]{20,}",
        r"Bearer\s+[a-zA-Z0-9._\-]{10,}",
    ]
    .into_iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redact known key shapes and the given exact secrets from `input`.
pub fn redact(input: &str, secrets: &[&str]) -> String {
    let mut result = input.to_string();

    for pattern in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, REDACTED).into_owned();
    }

    // Longest first so a secret containing another is removed whole.
    let mut sorted: Vec<&str> = secrets.iter().copied().filter(|s| !s.is_empty()).collect();
    sorted.sort_by_key(|s| std::cmp::Reverse(s.len()));
    for secret in sorted {
        result = result.replace(secret, REDACTED);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_known_key_shapes() {
        let input = "keys: sk-ant-REDACTED and sk-proj-abcdefghijklmnopqrstuv \
                     and xai-abcdefghijklmnopqrstuv and AIzaSyA1234567890abcdefghijklmnopqrs";
        let out = redact(input, &[]);
        assert!(!out.contains("abcdefghijklmnopqrstuv"));
        assert!(!out.contains("AIzaSy"));
        assert_eq!(out.matches(REDACTED).count(), 4);
    }

    #[test]
    fn redacts_exact_secret_even_if_short() {
        let out = redact("Incorrect API key provided: sk-tiny1", &["sk-tiny1"]);
        assert_eq!(out, format!("Incorrect API key provided: {REDACTED}"));
    }

    #[test]
    fn leaves_ordinary_text_alone() {
        let msg = "model `gpt-5` does not exist";
        assert_eq!(redact(msg, &["sk-abc1234567"]), msg);
    }

    #[test]
    fn empty_secret_is_ignored() {
        assert_eq!(redact("nothing here", &[""]), "nothing here");
    }
}
