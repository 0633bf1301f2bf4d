//! Salted secret derivation
//!
//! The 32-byte secret is `SHA256(salt ‖ password)` with an 8-byte salt.
//! This exact rule encrypts the identity file and derives the database
//! encryption key, so it is part of the on-disk format.

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::hashing::sha256_parts;

/// Salt size in bytes
pub const SALT_LEN: usize = 8;

/// A 32-byte symmetric secret that zeroizes on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret([u8; 32]);

impl Secret {
    /// Raw secret bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Derive the 32-byte secret from a password and an 8-byte salt
pub fn derive_secret(password: &[u8], salt: &[u8]) -> Result<Secret, CryptoError> {
    if salt.len() != SALT_LEN {
        return Err(CryptoError::InvalidSalt {
            expected: SALT_LEN,
            got: salt.len(),
        });
    }

    // Secret is: SHA256(salt || password)
    Ok(Secret(sha256_parts(&[salt, password])))
}

/// Generate a random 8-byte salt from the operating system RNG
pub fn random_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}
