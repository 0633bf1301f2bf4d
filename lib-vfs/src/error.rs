//! Transaction codec errors

use thiserror::Error;

/// Errors from decoding transaction bytes
#[derive(Debug, Error)]
pub enum TxError {
    /// The bytes do not parse as a transaction, or a contractual field
    /// is missing or malformed
    #[error("invalid transaction format: {0}")]
    InvalidFormat(String),
}
