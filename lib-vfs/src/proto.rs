//! Transaction wire types
//!
//! Field numbers are PROTOCOL. They are fixed by the network's transaction
//! format and changing them breaks every stored and in-flight payload.
//!
//! The message shapes are written out by hand rather than generated at
//! build time; there is no build-step protoc dependency.

/// A signed transaction as carried in the consensus log
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transaction {
    /// Signer public key; only the Ed25519 variant is valid
    #[prost(message, optional, tag = "1")]
    pub signer: Option<PublicKey>,

    /// Ed25519 signature over the raw body bytes (64 bytes)
    #[prost(bytes = "vec", tag = "2")]
    pub signature: Vec<u8>,

    /// SHA-256 transaction hash; may be empty on ingest
    #[prost(bytes = "vec", tag = "3")]
    pub hash: Vec<u8>,

    /// Submission time; second precision is sufficient
    #[prost(message, optional, tag = "4")]
    pub time: Option<::prost_types::Timestamp>,

    /// Body length in bytes
    #[prost(uint32, tag = "5")]
    pub len: u32,

    /// Arbitrary body bytes
    #[prost(bytes = "vec", tag = "6")]
    pub body: Vec<u8>,
}

/// A public key, polymorphic over key schemes
///
/// Only Ed25519 is in use; decoding rejects every other variant.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PublicKey {
    #[prost(oneof = "public_key::Sum", tags = "1")]
    pub sum: Option<public_key::Sum>,
}

/// Nested message and enum types in `PublicKey`
pub mod public_key {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Sum {
        /// 32-byte Ed25519 public key
        #[prost(bytes, tag = "1")]
        Ed25519(Vec<u8>),
    }
}

impl PublicKey {
    /// Wrap raw Ed25519 key bytes in the wire shape
    pub fn ed25519(bytes: Vec<u8>) -> Self {
        Self {
            sum: Some(public_key::Sum::Ed25519(bytes)),
        }
    }

    /// The Ed25519 key bytes, if that variant is set
    pub fn as_ed25519(&self) -> Option<&[u8]> {
        match &self.sum {
            Some(public_key::Sum::Ed25519(bytes)) => Some(bytes),
            None => None,
        }
    }
}
