//! Cryptographic primitives for vStore
//!
//! Provides the four primitives the store is built on:
//!
//! - Ed25519 signing and verification ([`keypair`])
//! - SHA-256 hashing ([`hashing`])
//! - AES-256-GCM sealing with an in-line nonce ([`symmetric`])
//! - Salted secret derivation from a password ([`secret`])
//!
//! The secret derivation rule is shared by the identity vault and the
//! database encryption layer and is part of the on-disk format. Do not
//! substitute a different KDF.

pub mod error;
pub mod hashing;
pub mod keypair;
pub mod secret;
pub mod symmetric;

pub use error::CryptoError;
pub use keypair::{Keypair, PublicKey, Signature};
pub use secret::{derive_secret, random_salt, Secret, SALT_LEN};
