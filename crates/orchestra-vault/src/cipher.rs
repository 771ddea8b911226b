// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! String-level cipher bound to the master secret.

use orchestra_core::OrchestraError;
use secrecy::{ExposeSecret, SecretString};

use crate::crypto::{self, SealedSecret};
use crate::kdf;

/// Encrypts and decrypts credential secrets.
///
/// Holds the master secret, not a key: the key is derived again for every
/// call and wiped when the call returns. Debug output omits both.
pub struct VaultCipher {
    master_secret: SecretString,
    salt: String,
}

impl std::fmt::Debug for VaultCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultCipher")
            .field("master_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl VaultCipher {
    /// Bind a cipher to a master secret and KDF salt.
    pub fn new(master_secret: SecretString, salt: impl Into<String>) -> Result<Self, OrchestraError> {
        if master_secret.expose_secret().is_empty() {
            return Err(OrchestraError::Configuration(
                "master secret must not be empty".to_string(),
            ));
        }
        let salt = salt.into();
        if salt.is_empty() {
            return Err(OrchestraError::Configuration(
                "KDF salt must not be empty".to_string(),
            ));
        }
        Ok(Self {
            master_secret,
            salt,
        })
    }

    /// Cipher using the salt every existing record was written with.
    pub fn with_default_salt(master_secret: SecretString) -> Result<Self, OrchestraError> {
        Self::new(master_secret, kdf::DEFAULT_KDF_SALT)
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<SealedSecret, OrchestraError> {
        let key = self.derive()?;
        crypto::seal(&key, plaintext.as_bytes())
    }

    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        nonce: &[u8],
        tag: &[u8],
    ) -> Result<SecretString, OrchestraError> {
        let key = self.derive()?;
        let mut plaintext = crypto::open(&key, ciphertext, nonce, tag)?;
        let value = String::from_utf8(std::mem::take(&mut *plaintext)).map_err(|_| {
            OrchestraError::Integrity("decrypted secret is not valid UTF-8".to_string())
        })?;
        Ok(SecretString::from(value))
    }

    fn derive(&self) -> Result<zeroize::Zeroizing<[u8; kdf::KEY_LEN]>, OrchestraError> {
        kdf::derive_key(
            self.master_secret.expose_secret().as_bytes(),
            self.salt.as_bytes(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher(secret: &str) -> VaultCipher {
        VaultCipher::with_default_salt(SecretString::from(secret.to_string())).unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = cipher("test-master-secret");
        let sealed = cipher.encrypt("sk-ant-api03-abcdef").unwrap();
        let secret = cipher
            .decrypt(&sealed.ciphertext, &sealed.nonce, &sealed.tag)
            .unwrap();
        assert_eq!(secret.expose_secret(), "sk-ant-api03-abcdef");
    }

    #[test]
    fn records_survive_a_new_cipher_with_the_same_master_secret() {
        let sealed = cipher("restart-secret").encrypt("xai-1234567890").unwrap();
        let secret = cipher("restart-secret")
            .decrypt(&sealed.ciphertext, &sealed.nonce, &sealed.tag)
            .unwrap();
        assert_eq!(secret.expose_secret(), "xai-1234567890");
    }

    #[test]
    fn different_master_secret_cannot_decrypt() {
        let sealed = cipher("secret-a").encrypt("pplx-1234567890").unwrap();
        let err = cipher("secret-b")
            .decrypt(&sealed.ciphertext, &sealed.nonce, &sealed.tag)
            .unwrap_err();
        assert!(matches!(err, OrchestraError::Integrity(_)));
    }

    #[test]
    fn empty_master_secret_or_salt_is_rejected() {
        let err = VaultCipher::with_default_salt(SecretString::from(String::new())).unwrap_err();
        assert!(matches!(err, OrchestraError::Configuration(_)));
        let err = VaultCipher::new(SecretString::from("x".to_string()), "").unwrap_err();
        assert!(matches!(err, OrchestraError::Configuration(_)));
    }

    #[test]
    fn debug_redacts_master_secret() {
        let debug = format!("{:?}", cipher("super-secret-master"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-master"));
    }
}
