//! Identity vault for vStore nodes
//!
//! A node's identity is an Ed25519 key pair stored in a password-protected
//! file. The same password-derived secret that seals the private key also
//! encrypts the node's local database, so the vault is the root of trust
//! for both signing and storage.
//!
//! # File format
//!
//! `base64( salt (8) ‖ AES-256-GCM( SHA256(salt ‖ password), privkey (64) ) )`
//!
//! A sibling `<path>.pub` file carries the base64-encoded public key in
//! clear.

pub mod error;
pub mod provider;
pub mod vault;

pub use error::IdentityError;
pub use provider::SecretProvider;
pub use vault::IdentityFile;
