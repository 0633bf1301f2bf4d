//! Password-protected identity file
//!
//! Operations hold the password only for their own duration; derived
//! secrets zeroize on drop.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use lib_crypto::{derive_secret, random_salt, symmetric, Keypair, PublicKey, Secret, SALT_LEN};

use crate::error::IdentityError;

/// A password-protected identity file on disk
///
/// The struct holds only the path; every operation takes the password
/// explicitly and forgets it on return.
#[derive(Debug, Clone)]
pub struct IdentityFile {
    path: PathBuf,
}

impl IdentityFile {
    /// Reference an identity file at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the encrypted identity file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path of the cleartext public key sibling file
    pub fn pub_path(&self) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(".pub");
        PathBuf::from(os)
    }

    /// Whether the identity file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Generate a fresh identity at `path`, protected by `password`
    ///
    /// Creates the parent directory (mode 0700) when missing, writes the
    /// sealed private key (mode 0600) and the `.pub` sibling (mode 0644).
    /// Returns the paths of both files.
    pub fn generate(
        path: impl Into<PathBuf>,
        password: &[u8],
    ) -> Result<(PathBuf, PathBuf), IdentityError> {
        if password.is_empty() {
            return Err(IdentityError::EmptyPassword);
        }

        let id = Self::new(path);

        if let Some(parent) = id.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                set_mode(parent, 0o700)?;
            }
        }

        let keypair = Keypair::generate();

        // Random salt, then the shared derivation rule
        let salt = random_salt();
        let secret = derive_secret(password, &salt)?;

        // Seal the 64-byte private key and prepend the cleartext salt;
        // the salt must stay readable to re-derive the secret.
        let sealed = symmetric::seal(&secret, &keypair.to_private_bytes())?;
        let mut blob = Vec::with_capacity(SALT_LEN + sealed.len());
        blob.extend_from_slice(&salt);
        blob.extend_from_slice(&sealed);

        fs::write(&id.path, BASE64.encode(&blob))?;
        set_mode(&id.path, 0o600)?;

        let pub_path = id.pub_path();
        fs::write(&pub_path, BASE64.encode(keypair.public().as_bytes()))?;
        set_mode(&pub_path, 0o644)?;

        tracing::info!(
            target: "identity",
            path = %id.path.display(),
            pubkey = %keypair.public().to_hex_upper(),
            "generated new identity"
        );

        Ok((id.path, pub_path))
    }

    /// Open the identity file and return the key pair
    pub fn open(&self, password: &[u8]) -> Result<Keypair, IdentityError> {
        let (salt, sealed) = self.split_blob()?;
        let secret = derive_secret(password, &salt)?;

        let private = symmetric::open(&secret, &sealed)?;
        let keypair = Keypair::from_private_bytes(&private)?;

        Ok(keypair)
    }

    /// Return the derived 32-byte secret without exposing the private key
    ///
    /// This secret encrypts the node's database. It is valid only if the
    /// password matches; callers that need certainty should `open` first.
    pub fn secret(&self, password: &[u8]) -> Result<Secret, IdentityError> {
        if password.is_empty() {
            return Err(IdentityError::EmptyPassword);
        }

        let (salt, _) = self.split_blob()?;
        Ok(derive_secret(password, &salt)?)
    }

    /// Derive the public key from the opened private key
    pub fn public_key(&self, password: &[u8]) -> Result<PublicKey, IdentityError> {
        Ok(*self.open(password)?.public())
    }

    /// Read and base64-decode the file, split off the 8-byte salt
    fn split_blob(&self) -> Result<([u8; SALT_LEN], Vec<u8>), IdentityError> {
        if !self.path.exists() {
            return Err(IdentityError::Missing(self.path.clone()));
        }

        let encoded = fs::read_to_string(&self.path)?;
        let blob = BASE64
            .decode(encoded.trim())
            .map_err(|e| IdentityError::Encoding(e.to_string()))?;

        if blob.len() <= SALT_LEN {
            return Err(IdentityError::Truncated);
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&blob[..SALT_LEN]);
        Ok((salt, blob[SALT_LEN..].to_vec()))
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
