// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open with a 128-bit nonce and detached tag.
//!
//! Every call to [`seal`] draws a fresh random nonce from the system CSPRNG.
//! Nonce reuse under one key would be catastrophic for GCM.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce, Tag};
use orchestra_core::OrchestraError;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// AES-256-GCM instantiated with a 16-byte nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

pub const NONCE_LEN: usize = 16;
pub const TAG_LEN: usize = 16;

/// Output of [`seal`]: all three parts are needed to open it again.
#[derive(Clone, PartialEq, Eq)]
pub struct SealedSecret {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
}

impl std::fmt::Debug for SealedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedSecret")
            .field("ciphertext_len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<SealedSecret, OrchestraError> {
    let cipher = Aes256Gcm16::new_from_slice(key)
        .map_err(|_| OrchestraError::Crypto("failed to create AES-256-GCM key".to_string()))?;

    let mut nonce = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce)
        .map_err(|_| OrchestraError::Crypto("failed to generate random nonce".to_string()))?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<U16>::from_slice(&nonce), b"", &mut buffer)
        .map_err(|_| OrchestraError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(tag.as_slice());

    Ok(SealedSecret {
        ciphertext: buffer,
        nonce,
        tag: tag_bytes,
    })
}

/// Verify and decrypt. Nothing is returned unless the tag authenticates.
///
/// Wrong nonce or tag lengths are treated like a failed tag check: the record
/// is corrupt either way.
pub fn open(
    key: &[u8; 32],
    ciphertext: &[u8],
    nonce: &[u8],
    tag: &[u8],
) -> Result<Zeroizing<Vec<u8>>, OrchestraError> {
    if nonce.len() != NONCE_LEN {
        return Err(OrchestraError::Integrity(format!(
            "nonce must be {NONCE_LEN} bytes, got {}",
            nonce.len()
        )));
    }
    if tag.len() != TAG_LEN {
        return Err(OrchestraError::Integrity(format!(
            "authentication tag must be {TAG_LEN} bytes, got {}",
            tag.len()
        )));
    }

    let cipher = Aes256Gcm16::new_from_slice(key)
        .map_err(|_| OrchestraError::Crypto("failed to create AES-256-GCM key".to_string()))?;

    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_in_place_detached(
            Nonce::<U16>::from_slice(nonce),
            b"",
            buffer.as_mut_slice(),
            Tag::from_slice(tag),
        )
        .map_err(|_| {
            OrchestraError::Integrity(
                "authentication failed -- wrong key or tampered record".to_string(),
            )
        })?;

    Ok(buffer)
}
