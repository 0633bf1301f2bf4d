//! AES-256-GCM sealing with an in-line nonce
//!
//! Sealed blobs are laid out as `nonce (12) ‖ ciphertext ‖ tag (16)`.
//! The nonce is drawn fresh from the operating system RNG for every
//! seal operation and stored in plaintext in front of the ciphertext.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;

use crate::error::CryptoError;
use crate::secret::Secret;

/// AES-GCM nonce size in bytes
pub const NONCE_LEN: usize = 12;

/// Encrypt a plaintext under the secret, prepending the random nonce
pub fn seal(secret: &Secret, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(secret.as_bytes())
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Decrypt a sealed blob, parsing the nonce from its first 12 bytes
pub fn open(secret: &Secret, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() <= NONCE_LEN {
        return Err(CryptoError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(secret.as_bytes())
        .map_err(|_| CryptoError::DecryptionFailed)?;

    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}
