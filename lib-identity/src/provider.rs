//! Long-lived secret provider for the application
//!
//! The application needs the database encryption secret at every commit
//! and every decrypting query. The provider pairs the identity file with
//! its password so the secret can be re-derived on demand and dropped
//! (zeroized) right after use; the plaintext private key is never kept
//! in memory between operations.

use zeroize::Zeroizing;

use lib_crypto::{Keypair, PublicKey, Secret};

use crate::error::IdentityError;
use crate::vault::IdentityFile;

/// Re-derives identity secrets on demand
pub struct SecretProvider {
    file: IdentityFile,
    password: Zeroizing<Vec<u8>>,
}

impl SecretProvider {
    /// Bind an identity file to its password
    ///
    /// The identity is opened once to prove the password is correct, then
    /// the plaintext key is dropped. Fails with the vault's error if the
    /// file is missing or the password does not match.
    pub fn new(file: IdentityFile, password: Vec<u8>) -> Result<Self, IdentityError> {
        if password.is_empty() {
            return Err(IdentityError::EmptyPassword);
        }

        let provider = Self {
            file,
            password: Zeroizing::new(password),
        };

        // Proves both file integrity and password correctness
        provider.file.open(&provider.password)?;

        Ok(provider)
    }

    /// The identity file backing this provider
    pub fn file(&self) -> &IdentityFile {
        &self.file
    }

    /// The database encryption secret; zeroizes on drop
    pub fn secret(&self) -> Result<Secret, IdentityError> {
        self.file.secret(&self.password)
    }

    /// Open the identity and return the key pair
    pub fn keypair(&self) -> Result<Keypair, IdentityError> {
        self.file.open(&self.password)
    }

    /// The node's public key
    pub fn public_key(&self) -> Result<PublicKey, IdentityError> {
        self.file.public_key(&self.password)
    }
}

impl std::fmt::Debug for SecretProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretProvider").field("file", &self.file).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_provider_validates_password_up_front() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("id");
        IdentityFile::generate(&path, b"pw").unwrap();

        assert!(SecretProvider::new(IdentityFile::new(&path), b"pw".to_vec()).is_ok());
        assert!(SecretProvider::new(IdentityFile::new(&path), b"wrong".to_vec()).is_err());
        assert!(matches!(
            SecretProvider::new(IdentityFile::new(&path), Vec::new()),
            Err(IdentityError::EmptyPassword)
        ));
    }

    #[test]
    fn test_provider_secret_is_stable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("id");
        IdentityFile::generate(&path, b"pw").unwrap();

        let provider = SecretProvider::new(IdentityFile::new(&path), b"pw".to_vec()).unwrap();
        assert_eq!(
            provider.secret().unwrap().as_bytes(),
            provider.secret().unwrap().as_bytes()
        );
    }

    #[test]
    fn test_provider_public_key_matches_vault() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("id");
        IdentityFile::generate(&path, b"pw").unwrap();

        let provider = SecretProvider::new(IdentityFile::new(&path), b"pw".to_vec()).unwrap();
        let expected = IdentityFile::new(&path).public_key(b"pw").unwrap();
        assert_eq!(provider.public_key().unwrap(), expected);
    }
}
