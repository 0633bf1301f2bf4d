//! Identity vault errors

use std::path::PathBuf;
use thiserror::Error;

use lib_crypto::CryptoError;

/// Errors from identity vault operations
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The identity file does not exist or cannot be read
    #[error("could not open identity file: {0}")]
    Missing(PathBuf),

    /// An empty password was provided
    #[error("password must not be empty")]
    EmptyPassword,

    /// The identity file is not valid base64
    #[error("identity file is not valid base64: {0}")]
    Encoding(String),

    /// The identity file is too short to contain a salt and ciphertext
    #[error("identity file is truncated")]
    Truncated,

    /// A cryptographic operation failed; a failed decrypt means the
    /// password is wrong or the file was tampered with
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Filesystem I/O failed
    #[error("identity I/O error: {0}")]
    Io(#[from] std::io::Error),
}
