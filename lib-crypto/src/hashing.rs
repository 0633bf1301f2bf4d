//! SHA-256 hashing
//!
//! SHA-256 is the canonical hash function for all vStore commitments:
//! transaction hashes, merkle nodes and the derived database secret.

use sha2::{Digest, Sha256};

/// SHA-256 hash function
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(data);
    digest.into()
}

/// Hash multiple data segments as one message
pub fn sha256_parts(segments: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for segment in segments {
        hasher.update(segment);
    }
    hasher.finalize().into()
}
