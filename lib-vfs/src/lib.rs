//! vStore core
//!
//! vfs implements a verifiable, signature-attested, content-addressed data
//! store driven by a consensus-style block lifecycle. It focusses on:
//!
//! - data integrity: attaching timestamp and signature information to data
//! - data redundancy: every replica applies the same block lifecycle
//! - data security: the consensus log carries only transaction bytes; the
//!   datum itself lives in an encrypted local store
//!
//! # Modules
//!
//! - [`proto`]: the protobuf wire shape of a transaction (contractual)
//! - [`tx`]: signed transactions, the decode/encode contracts and the
//!   canonical transaction hash
//! - [`state`]: the application state and per-signer merkle accumulation
//! - [`store`]: the sled-backed, prefix-partitioned key-value store
//! - [`app`]: the application state machine invoked by the consensus
//!   engine (check, propose, process, finalize, commit, query)

pub mod app;
pub mod error;
pub mod proto;
pub mod state;
pub mod store;
pub mod tx;

pub use app::driver::{LocalDriver, RoundOutcome};
pub use app::{AppError, VStoreApp};
pub use error::TxError;
pub use state::State;
pub use store::{StoreError, VfsStore};
pub use tx::SignedTransaction;
