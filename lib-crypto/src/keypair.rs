//! Ed25519 key pairs, signing and verification
//!
//! Signatures always cover the raw message bytes, never a derived hash,
//! so verification is independent of timestamp conventions.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::error::CryptoError;

/// Ed25519 public key size in bytes
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 private key size in bytes (seed followed by public key)
pub const PRIVATE_KEY_LEN: usize = 64;

/// Ed25519 signature size in bytes
pub const SIGNATURE_LEN: usize = 64;

/// An Ed25519 public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

/// An Ed25519 signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LEN]);

/// An Ed25519 key pair
#[derive(Clone)]
pub struct Keypair {
    signing: SigningKey,
    public: PublicKey,
}

impl PublicKey {
    /// Parse a public key from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "expected {} bytes of public key, got {}",
                PUBLIC_KEY_LEN,
                bytes.len()
            ))
        })?;

        // Point validity is checked at verification time; a key that is
        // not on the curve simply fails to verify.
        Ok(Self(raw))
    }

    /// Raw public key bytes
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Uppercase hexadecimal representation, used as the signer key in
    /// the application state
    pub fn to_hex_upper(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Verify a signature over a message
    ///
    /// Returns false for any failure, including malformed key material.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        key.verify(message, &sig).is_ok()
    }
}

impl Signature {
    /// Parse a signature from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidSignature(format!(
                "expected {} bytes of signature, got {}",
                SIGNATURE_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    /// Raw signature bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }
}

impl Keypair {
    /// Generate a new key pair from the operating system RNG
    pub fn generate() -> Self {
        let signing = SigningKey::generate(&mut OsRng);
        let public = PublicKey(signing.verifying_key().to_bytes());
        Self { signing, public }
    }

    /// Restore a key pair from its 64-byte private key representation
    /// (32-byte seed followed by the 32-byte public key)
    pub fn from_private_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw: [u8; PRIVATE_KEY_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "expected {} bytes of private key, got {}",
                PRIVATE_KEY_LEN,
                bytes.len()
            ))
        })?;

        let signing = SigningKey::from_keypair_bytes(&raw)
            .map_err(|e| CryptoError::InvalidKey(format!("inconsistent key pair: {}", e)))?;
        let public = PublicKey(signing.verifying_key().to_bytes());

        Ok(Self { signing, public })
    }

    /// The 64-byte private key representation (seed followed by public key)
    pub fn to_private_bytes(&self) -> [u8; PRIVATE_KEY_LEN] {
        self.signing.to_keypair_bytes()
    }

    /// The public half of the key pair
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// Sign a message with the private key
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing.sign(message).to_bytes())
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print private key material
        f.debug_struct("Keypair").field("public", &self.public).finish_non_exhaustive()
    }
}
