// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA512 key derivation from the master secret.

use std::num::NonZeroU32;

use orchestra_core::OrchestraError;
use ring::pbkdf2;
use zeroize::Zeroizing;

/// Work factor. Changing it makes existing records undecryptable.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt used by every record written so far.
pub const DEFAULT_KDF_SALT: &str = "ai-orchestration-vault-v1";

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Derive the 32-byte vault key.
///
/// Deterministic for a given `(master_secret, salt)`. The returned key is
/// wrapped in [`Zeroizing`] and wiped on drop.
pub fn derive_key(master_secret: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, OrchestraError> {
    if master_secret.is_empty() {
        return Err(OrchestraError::Configuration(
            "master secret must not be empty".to_string(),
        ));
    }
    let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
        .ok_or_else(|| OrchestraError::Internal("PBKDF2 iteration count is zero".to_string()))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA512,
        iterations,
        salt,
        master_secret,
        key.as_mut(),
    );
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_is_deterministic() {
        let key1 = derive_key(b"master secret", DEFAULT_KDF_SALT.as_bytes()).unwrap();
        let key2 = derive_key(b"master secret", DEFAULT_KDF_SALT.as_bytes()).unwrap();
        assert_eq!(*key1, *key2);
    }

    #[test]
    fn derive_key_matches_pbkdf2_sha512_with_100k_iterations() {
        let key = derive_key(b"master secret", DEFAULT_KDF_SALT.as_bytes()).unwrap();
        let verified = pbkdf2::verify(
            pbkdf2::PBKDF2_HMAC_SHA512,
            NonZeroU32::new(100_000).unwrap(),
            DEFAULT_KDF_SALT.as_bytes(),
            b"master secret",
            key.as_ref(),
        );
        assert!(verified.is_ok());
    }

    #[test]
    fn different_secret_produces_different_key() {
        let key1 = derive_key(b"secret one", DEFAULT_KDF_SALT.as_bytes()).unwrap();
        let key2 = derive_key(b"secret two", DEFAULT_KDF_SALT.as_bytes()).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn different_salt_produces_different_key() {
        let key1 = derive_key(b"same secret", b"salt-a").unwrap();
        let key2 = derive_key(b"same secret", b"salt-b").unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn empty_master_secret_is_a_configuration_error() {
        let err = derive_key(b"", DEFAULT_KDF_SALT.as_bytes()).unwrap_err();
        assert!(matches!(err, OrchestraError::Configuration(_)));
    }
}
