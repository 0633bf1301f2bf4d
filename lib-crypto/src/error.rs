//! Error types for cryptographic operations

use thiserror::Error;

/// Errors from cryptographic operations
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The provided key material is malformed for the algorithm
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// The provided signature bytes are malformed
    #[error("invalid signature format: {0}")]
    InvalidSignature(String),

    /// AEAD decryption failed (wrong key or tampered ciphertext)
    #[error("decryption failed")]
    DecryptionFailed,

    /// AEAD encryption failed
    #[error("encryption failed")]
    EncryptionFailed,

    /// A salt had an unexpected length
    #[error("invalid salt size, want: {expected}, got: {got}")]
    InvalidSalt { expected: usize, got: usize },
}
