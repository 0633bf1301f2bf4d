//! Callback request/response shapes
//!
//! The application is driven through these types by whatever sits on the
//! consensus side; they mirror the engine's callback contract without
//! pulling its transport into the core.

/// Result codes shared by every per-transaction response
pub mod code {
    /// Transaction accepted
    pub const OK: u32 = 0;
    /// The body is empty
    pub const EMPTY_DATA: u32 = 1;
    /// The bytes do not parse as a transaction
    pub const INVALID_FORMAT: u32 = 2;
    /// The Ed25519 signature does not verify
    pub const INVALID_SIGNATURE: u32 = 3;
}

/// Version of the callback interface the application speaks
pub const ABCI_VERSION: &str = "2.0.0";

/// Version of the application itself, reported through `info`
pub const APP_VERSION: u64 = 1;

/// Response to `info`
#[derive(Debug, Clone)]
pub struct InfoResponse {
    /// Serialized application state JSON
    pub data: String,
    /// Callback interface version
    pub version: String,
    /// Application version
    pub app_version: u64,
    /// Most recent finalized height
    pub last_block_height: i64,
    /// App-hash after the most recent commit
    pub last_block_app_hash: [u8; 32],
}

/// Per-transaction result within a finalized block
#[derive(Debug, Clone)]
pub struct ExecTxResult {
    /// One of the [`code`] constants
    pub code: u32,
    /// The transaction hash, or empty when the bytes did not decode
    pub data: Vec<u8>,
    /// Human-readable reason for non-OK codes
    pub log: String,
}

/// Response to `finalize_block`
#[derive(Debug, Clone)]
pub struct FinalizeBlockResponse {
    /// One result per delivered transaction, in delivery order
    pub tx_results: Vec<ExecTxResult>,
    /// The app-hash after folding this block's stage
    pub app_hash: [u8; 32],
}

/// Verdict of `process_proposal`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    /// Every transaction in the proposal passed validation
    Accept,
    /// At least one transaction failed validation
    Reject,
}

/// Response to `query`
#[derive(Debug, Clone)]
pub struct QueryResponse {
    /// One of the [`code`] constants
    pub code: u32,
    /// Echo of the queried key bytes
    pub key: Vec<u8>,
    /// The looked-up value; empty when nothing was found
    pub value: Vec<u8>,
    /// Height the response was served at
    pub height: i64,
    /// Lookup outcome description
    pub log: String,
    /// Proof index; -1 when a proof was requested (none are produced yet)
    pub index: i64,
}
