//! Signed transactions
//!
//! A signed transaction carries an owner public key, an Ed25519 signature
//! over the raw body bytes, a timestamp and the body itself. Its identity
//! is the canonical SHA-256 hash:
//!
//! `SHA256( signer ‖ body ‖ be_u64(unix_seconds(time)) )`
//!
//! The hash covers the timestamp truncated to seconds, so it is stable
//! across timestamp precision conversions even though the wire format can
//! carry nanoseconds.

use prost::Message;

use lib_crypto::hashing::sha256_parts;
use lib_crypto::{Keypair, PublicKey, Signature};

use crate::error::TxError;
use crate::proto;

/// A signed data payload, the store's core datum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Owner public key (32 bytes)
    pub signer: PublicKey,
    /// Signature over the raw body; 64 bytes when well-formed, kept as
    /// received so that signature validity stays a verification concern
    pub signature: Vec<u8>,
    /// Canonical transaction hash; filled at decode time when absent
    pub hash: Vec<u8>,
    /// Body length as carried on the wire
    pub size: u32,
    /// Submission time, unix seconds
    pub time_secs: i64,
    /// Sub-second part of the wire timestamp; never hashed
    pub time_nanos: i32,
    /// Arbitrary body bytes
    pub body: Vec<u8>,
}

impl SignedTransaction {
    /// Build and sign a transaction over `body` at the given unix time
    pub fn sign(keypair: &Keypair, body: Vec<u8>, time_secs: i64) -> Self {
        let signature = keypair.sign(&body).as_bytes().to_vec();
        let mut tx = Self {
            signer: *keypair.public(),
            signature,
            hash: Vec::new(),
            size: body.len() as u32,
            time_secs,
            time_nanos: 0,
            body,
        };
        tx.hash = tx.compute_hash().to_vec();
        tx
    }

    /// Decode a transaction from wire bytes
    ///
    /// Malformed input fails with [`TxError::InvalidFormat`]. An empty
    /// hash field is recomputed from `(signer, body, time)`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TxError> {
        let pb = proto::Transaction::decode(bytes)
            .map_err(|e| TxError::InvalidFormat(e.to_string()))?;

        let mut tx = Self::from_proto(pb)?;
        if tx.hash.is_empty() {
            tx.hash = tx.compute_hash().to_vec();
        }

        Ok(tx)
    }

    /// Convert from the wire shape
    ///
    /// The hash is taken as-is; [`from_bytes`](Self::from_bytes) is the
    /// canonical entry point that fills it.
    pub fn from_proto(pb: proto::Transaction) -> Result<Self, TxError> {
        let signer_bytes = pb
            .signer
            .as_ref()
            .and_then(|pk| pk.as_ed25519())
            .ok_or_else(|| {
                TxError::InvalidFormat("signer is missing or not an Ed25519 key".into())
            })?;

        let signer = PublicKey::from_bytes(signer_bytes)
            .map_err(|e| TxError::InvalidFormat(e.to_string()))?;

        let (time_secs, time_nanos) = match pb.time {
            Some(ts) => (ts.seconds, ts.nanos),
            None => (0, 0),
        };

        Ok(Self {
            signer,
            signature: pb.signature,
            hash: pb.hash,
            size: pb.len,
            time_secs,
            time_nanos,
            body: pb.body,
        })
    }

    /// Convert to the canonical wire shape
    ///
    /// The hash is recomputed when empty, the length is derived from the
    /// body and the timestamp is truncated to seconds.
    pub fn to_proto(&self) -> proto::Transaction {
        let hash = if self.hash.is_empty() {
            self.compute_hash().to_vec()
        } else {
            self.hash.clone()
        };

        proto::Transaction {
            signer: Some(proto::PublicKey::ed25519(self.signer.as_bytes().to_vec())),
            signature: self.signature.clone(),
            hash,
            time: Some(::prost_types::Timestamp {
                seconds: self.time_secs,
                nanos: 0,
            }),
            len: self.body.len() as u32,
            body: self.body.clone(),
        }
    }

    /// Canonical proto-encoded bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    /// Compute the canonical transaction hash
    pub fn compute_hash(&self) -> [u8; 32] {
        let time_bytes = (self.time_secs as u64).to_be_bytes();
        sha256_parts(&[self.signer.as_bytes(), &self.body, &time_bytes])
    }

    /// Verify the signature over the raw body bytes
    ///
    /// Returns false for malformed signatures of any length.
    pub fn verify(&self) -> bool {
        match Signature::from_bytes(&self.signature) {
            Ok(sig) => self.signer.verify(&self.body, &sig),
            Err(_) => false,
        }
    }

    /// Uppercase hexadecimal signer key, the state map key
    pub fn signer_hex(&self) -> String {
        self.signer.to_hex_upper()
    }
}
