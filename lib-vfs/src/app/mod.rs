//! The vStore application state machine
//!
//! The consensus engine drives the application through a fixed call
//! sequence: `check_tx` on mempool entry, `prepare_proposal` /
//! `process_proposal` around block proposal, then `finalize_block`
//! followed by `commit` once a block is decided. All lifecycle calls
//! arrive on one logical thread; `info` and `query` are read-only and
//! may run concurrently.
//!
//! Between `finalize_block` and `commit` the parsed transactions sit in
//! an in-memory stage. Nothing is persisted before `commit`.

pub mod driver;
pub mod types;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use lib_crypto::{symmetric, CryptoError};
use lib_identity::{IdentityError, SecretProvider};

use crate::state::State;
use crate::store::{keys, StoreError, VfsStore};
use crate::tx::SignedTransaction;

use types::{
    code, ExecTxResult, FinalizeBlockResponse, InfoResponse, ProposalStatus, QueryResponse,
    ABCI_VERSION, APP_VERSION,
};

/// Errors that abort a lifecycle call
///
/// Per-transaction validation failures never surface here; they are
/// reported through result codes. These errors are the fatal ones: the
/// caller is expected to treat a failed commit as a crash-and-recover
/// event.
#[derive(Debug, Error)]
pub enum AppError {
    /// The storage backend failed or a hash was committed twice
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The identity vault failed (missing file, bad password)
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Sealing or opening a transaction failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The state failed to serialize
    #[error("state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The cancellation flag was set before persistence began
    #[error("commit cancelled before persistence")]
    Cancelled,

    /// A driven proposal failed validation
    #[error("proposal rejected by validation")]
    Rejected,
}

/// Query path selecting the lookup keyspace
enum QueryKind {
    Hash,
    Height,
    PubKey,
}

fn query_kind(path: &str) -> QueryKind {
    match path {
        "/height" => QueryKind::Height,
        "/pubkey" => QueryKind::PubKey,
        _ => QueryKind::Hash,
    }
}

/// The vStore application
///
/// Owns the database handle, the replicated state, the block stage and
/// the identity provider for the lifetime of the process.
pub struct VStoreApp {
    state: State,
    stage: Vec<SignedTransaction>,
    store: VfsStore,
    identity: SecretProvider,
    cancel: Arc<AtomicBool>,
}

impl VStoreApp {
    /// Create an application over an open store and a validated identity
    pub fn new(store: VfsStore, identity: SecretProvider) -> Result<Self, AppError> {
        let pubkey = identity.public_key()?;
        tracing::info!(target: "vfs", identity = %pubkey.to_hex_upper(), "using identity");

        let state = store.load_state()?;
        tracing::debug!(
            target: "vfs",
            height = state.height,
            transactions = state.num_transactions,
            "loaded state"
        );

        Ok(Self {
            state,
            stage: Vec::new(),
            store,
            identity,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Create an application over a temporary in-memory store
    ///
    /// Nothing is persisted; intended for tests and local experiments.
    pub fn in_memory(identity: SecretProvider) -> Result<Self, AppError> {
        Self::new(VfsStore::open_temporary()?, identity)
    }

    /// The flag a driving caller sets to abort the next persistence step
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// The current replicated state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Read-only access to the underlying store
    pub fn store(&self) -> &VfsStore {
        &self.store
    }

    /// Stateless validation of raw transaction bytes
    fn validate_tx(&self, tx: &[u8]) -> u32 {
        let stx = match SignedTransaction::from_bytes(tx) {
            Ok(stx) => stx,
            Err(_) => return code::INVALID_FORMAT,
        };

        if stx.size == 0 || stx.body.is_empty() {
            return code::EMPTY_DATA;
        }

        if !stx.verify() {
            return code::INVALID_SIGNATURE;
        }

        code::OK
    }

    // ----------------------------------------------------------------
    // Consensus callback interface

    /// Report the application's versions, height and app-hash
    ///
    /// The consensus engine calls this on startup to decide whether to
    /// replay blocks; a zero height triggers `init_chain`.
    pub fn info(&self) -> Result<InfoResponse, AppError> {
        let data = serde_json::to_string(&self.state)?;

        Ok(InfoResponse {
            data,
            version: ABCI_VERSION.to_string(),
            app_version: APP_VERSION,
            last_block_height: self.state.height,
            last_block_app_hash: self.state.app_hash(),
        })
    }

    /// Return the current app-hash; 32 zero bytes for an empty store
    pub fn init_chain(&self) -> [u8; 32] {
        self.state.app_hash()
    }

    /// Stateless transaction validation
    ///
    /// Checks format, non-empty body and the Ed25519 signature, in that
    /// order. Never stages and never fails; the verdict is the code.
    pub fn check_tx(&self, tx: &[u8]) -> u32 {
        self.validate_tx(tx)
    }

    /// Filter a proposed transaction list down to the valid entries,
    /// preserving order
    pub fn prepare_proposal(&self, txs: &[Vec<u8>]) -> Vec<Vec<u8>> {
        txs.iter()
            .filter(|tx| self.check_tx(tx) == code::OK)
            .cloned()
            .collect()
    }

    /// Accept a proposal only if every transaction validates
    pub fn process_proposal(&self, txs: &[Vec<u8>]) -> ProposalStatus {
        for tx in txs {
            if self.check_tx(tx) != code::OK {
                return ProposalStatus::Reject;
            }
        }
        ProposalStatus::Accept
    }

    /// Execute a decided block against the in-memory state
    ///
    /// Parses every transaction into the stage and advances the height
    /// and counter. A transaction that fails to decode is reported with
    /// an `invalid-format` result (empty hash, reason in the log) and
    /// skipped; the block continues. Finishes by folding the staged
    /// hashes into the per-signer merkle roots.
    pub fn finalize_block(&mut self, height: i64, txs: &[Vec<u8>]) -> FinalizeBlockResponse {
        self.stage.clear();

        let mut tx_results = Vec::with_capacity(txs.len());
        for tx in txs {
            match SignedTransaction::from_bytes(tx) {
                Ok(stx) => {
                    tx_results.push(ExecTxResult {
                        code: code::OK,
                        data: stx.hash.clone(),
                        log: String::new(),
                    });

                    self.stage.push(stx);
                    self.state.num_transactions += 1;
                }
                Err(e) => {
                    // Not staged; the result carries no hash because the
                    // record never materialized
                    tracing::debug!(target: "vfs", error = %e, "transaction failed to decode");
                    tx_results.push(ExecTxResult {
                        code: code::INVALID_FORMAT,
                        data: Vec::new(),
                        log: e.to_string(),
                    });
                }
            }
        }

        self.state.height = height;

        for stx in &self.stage {
            self.state.fold_transaction(stx.signer_hex(), &stx.hash);
        }

        tracing::debug!(
            target: "vfs",
            height,
            staged = self.stage.len(),
            "finalized block"
        );

        FinalizeBlockResponse {
            tx_results,
            app_hash: self.state.app_hash(),
        }
    }

    /// Persist the staged block
    ///
    /// Seals every staged transaction with the identity-derived secret
    /// and writes it under its hash, appends the hash to both indexes,
    /// then saves the state. Any failure aborts the commit with no
    /// partial state saved. The secret is re-derived for this call only
    /// and zeroized on return.
    pub fn commit(&mut self) -> Result<(), AppError> {
        if self.cancel.load(Ordering::SeqCst) {
            tracing::warn!(target: "vfs", "commit cancelled; stage preserved");
            return Err(AppError::Cancelled);
        }

        let secret = self.identity.secret()?;

        for stx in &self.stage {
            let sealed = symmetric::seal(&secret, &stx.to_bytes())?;
            self.store.put_tx(&stx.hash, &sealed)?;
        }

        // Index every staged hash by height and by signer
        for stx in &self.stage {
            self.store.append_index(&keys::height_key(self.state.height), &stx.hash)?;
            self.store.append_index(&keys::pubkey_key(stx.signer.as_bytes()), &stx.hash)?;
        }

        self.store.save_state(&self.state)?;
        drop(secret);

        tracing::info!(
            target: "vfs",
            height = self.state.height,
            committed = self.stage.len(),
            "committed block"
        );

        self.stage.clear();
        Ok(())
    }

    /// Look up a transaction or an index row
    ///
    /// The path selects the keyspace: `/hash` (or empty) decrypts and
    /// returns the stored transaction, `/height` and `/pubkey` return
    /// the JSON hash list verbatim. Lookup failures leave the value
    /// empty with the reason in the log.
    pub fn query(&self, path: &str, data: &[u8], prove: bool) -> QueryResponse {
        let mut response = QueryResponse {
            code: code::OK,
            key: data.to_vec(),
            value: Vec::new(),
            height: self.state.height,
            log: String::new(),
            index: if prove { -1 } else { 0 },
        };

        match query_kind(path) {
            QueryKind::Hash => match self.read_sealed_tx(data) {
                Ok(Some(plain)) => {
                    response.value = plain;
                    response.log = "exists".into();
                }
                Ok(None) => response.log = "does not exist".into(),
                Err(e) => {
                    tracing::debug!(target: "vfs", error = %e, "query failed");
                    response.log = e.to_string();
                }
            },
            QueryKind::Height => {
                self.read_index_row(&keys::prefixed(keys::HEIGHT_PREFIX, data), &mut response)
            }
            QueryKind::PubKey => {
                self.read_index_row(&keys::prefixed(keys::PUBKEY_PREFIX, data), &mut response)
            }
        }

        response
    }

    /// Fetch and decrypt one stored transaction
    fn read_sealed_tx(&self, hash: &[u8]) -> Result<Option<Vec<u8>>, AppError> {
        let Some(sealed) = self.store.get_tx(hash)? else {
            return Ok(None);
        };

        // Secret lives for this read only
        let secret = self.identity.secret()?;
        let plain = symmetric::open(&secret, &sealed)?;

        Ok(Some(plain))
    }

    /// Read an index row into a query response
    fn read_index_row(&self, key: &[u8], response: &mut QueryResponse) {
        match self.store.read_index(key) {
            Ok(Some(list)) => {
                response.value = list;
                response.log = "exists".into();
            }
            Ok(None) => response.log = "does not exist".into(),
            Err(e) => {
                tracing::debug!(target: "vfs", error = %e, "index query failed");
                response.log = e.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_crypto::Keypair;
    use lib_identity::IdentityFile;
    use tempfile::TempDir;

    fn test_app() -> (VStoreApp, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("id");
        IdentityFile::generate(&path, b"pw").unwrap();
        let provider = SecretProvider::new(IdentityFile::new(&path), b"pw".to_vec()).unwrap();
        (VStoreApp::in_memory(provider).unwrap(), dir)
    }

    fn signed_bytes(keypair: &Keypair, body: &[u8]) -> Vec<u8> {
        SignedTransaction::sign(keypair, body.to_vec(), 1_700_000_000).to_bytes()
    }

    #[test]
    fn test_check_tx_codes() {
        let (app, _dir) = test_app();
        let keypair = Keypair::generate();

        assert_eq!(app.check_tx(&signed_bytes(&keypair, b"simple")), code::OK);
        assert_eq!(app.check_tx(&[0xff, 0xff]), code::INVALID_FORMAT);
        assert_eq!(app.check_tx(&signed_bytes(&keypair, b"")), code::EMPTY_DATA);
    }

    #[test]
    fn test_check_tx_forged_signature() {
        let (app, _dir) = test_app();
        let keypair = Keypair::generate();

        let mut tx = SignedTransaction::sign(&keypair, b"simple".to_vec(), 1_700_000_000);
        tx.signature.push(0x31);
        assert_eq!(app.check_tx(&tx.to_bytes()), code::INVALID_SIGNATURE);
    }

    #[test]
    fn test_prepare_proposal_filters_invalid() {
        let (app, _dir) = test_app();
        let keypair = Keypair::generate();

        let txs = vec![
            signed_bytes(&keypair, b"one"),
            signed_bytes(&keypair, b""),
            signed_bytes(&keypair, b"three"),
            signed_bytes(&keypair, b"four"),
        ];

        let accepted = app.prepare_proposal(&txs);
        assert_eq!(accepted.len(), 3);
        assert_eq!(accepted[0], txs[0]);
        assert_eq!(accepted[1], txs[2]);
        assert_eq!(accepted[2], txs[3]);
    }

    #[test]
    fn test_process_proposal_rejects_any_invalid() {
        let (app, _dir) = test_app();
        let keypair = Keypair::generate();

        let good = vec![signed_bytes(&keypair, b"one")];
        assert_eq!(app.process_proposal(&good), ProposalStatus::Accept);

        let mixed = vec![signed_bytes(&keypair, b"one"), signed_bytes(&keypair, b"")];
        assert_eq!(app.process_proposal(&mixed), ProposalStatus::Reject);
    }

    #[test]
    fn test_finalize_block_stages_and_reports() {
        let (mut app, _dir) = test_app();
        let keypair = Keypair::generate();

        let txs = vec![signed_bytes(&keypair, b"simple"), vec![0xff, 0xff]];
        let resp = app.finalize_block(1, &txs);

        assert_eq!(resp.tx_results.len(), 2);
        assert_eq!(resp.tx_results[0].code, code::OK);
        assert_eq!(resp.tx_results[0].data.len(), 32);
        assert_eq!(resp.tx_results[1].code, code::INVALID_FORMAT);
        assert!(resp.tx_results[1].data.is_empty());
        assert!(!resp.tx_results[1].log.is_empty());

        assert_eq!(app.state().height, 1);
        assert_eq!(app.state().num_transactions, 1);
        assert_eq!(app.state().merkle_roots.len(), 1);
        assert_ne!(resp.app_hash, [0u8; 32]);
    }

    #[test]
    fn test_commit_persists_and_clears_stage() {
        let (mut app, _dir) = test_app();
        let keypair = Keypair::generate();

        let tx_bytes = signed_bytes(&keypair, b"simple");
        let resp = app.finalize_block(1, &[tx_bytes.clone()]);
        let hash = resp.tx_results[0].data.clone();

        app.commit().unwrap();

        // The sealed row exists and decrypts back to the canonical bytes
        let query = app.query("/hash", &hash, false);
        assert_eq!(query.log, "exists");
        let stored = SignedTransaction::from_bytes(&query.value).unwrap();
        assert_eq!(stored.body, b"simple");

        // State was saved
        assert_eq!(app.store().load_state().unwrap(), *app.state());
    }

    #[test]
    fn test_duplicate_commit_is_fatal() {
        let (mut app, _dir) = test_app();
        let keypair = Keypair::generate();

        let tx_bytes = signed_bytes(&keypair, b"simple");
        app.finalize_block(1, &[tx_bytes.clone()]);
        app.commit().unwrap();

        let state_before = app.state().clone();

        // Same bytes re-finalized at the next height hash identically
        app.finalize_block(2, &[tx_bytes]);
        let err = app.commit().unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::DuplicateHash)));

        // The persisted state still reflects the first commit
        assert_eq!(app.store().load_state().unwrap(), state_before);
    }

    #[test]
    fn test_cancelled_commit_preserves_stage() {
        let (mut app, _dir) = test_app();
        let keypair = Keypair::generate();

        app.finalize_block(1, &[signed_bytes(&keypair, b"simple")]);

        app.cancel_flag().store(true, Ordering::SeqCst);
        assert!(matches!(app.commit().unwrap_err(), AppError::Cancelled));

        // Nothing was saved; the retry succeeds once the flag clears
        assert_eq!(app.store().load_state().unwrap(), State::default());
        app.cancel_flag().store(false, Ordering::SeqCst);
        app.commit().unwrap();
        assert_eq!(app.store().load_state().unwrap().height, 1);
    }

    #[test]
    fn test_query_height_and_pubkey_indexes() {
        let (mut app, _dir) = test_app();
        let keypair = Keypair::generate();

        let resp = app.finalize_block(1, &[signed_bytes(&keypair, b"simple")]);
        let hash = resp.tx_results[0].data.clone();
        app.commit().unwrap();

        let by_height = app.query("/height", b"1", false);
        let hashes: Vec<Vec<u8>> = serde_json::from_slice(&by_height.value).unwrap();
        assert!(hashes.contains(&hash));

        let by_pubkey = app.query("/pubkey", keypair.public().as_bytes(), false);
        let hashes: Vec<Vec<u8>> = serde_json::from_slice(&by_pubkey.value).unwrap();
        assert!(hashes.contains(&hash));
    }

    #[test]
    fn test_query_missing_hash() {
        let (app, _dir) = test_app();
        let resp = app.query("/hash", &[0u8; 32], false);
        assert!(resp.value.is_empty());
        assert_eq!(resp.log, "does not exist");
    }

    #[test]
    fn test_query_prove_flag_sets_index() {
        let (app, _dir) = test_app();
        assert_eq!(app.query("/hash", &[0u8; 32], true).index, -1);
        assert_eq!(app.query("/hash", &[0u8; 32], false).index, 0);
    }

    #[test]
    fn test_info_reports_versions_and_state() {
        let (app, _dir) = test_app();
        let info = app.info().unwrap();

        assert_eq!(info.app_version, APP_VERSION);
        assert_eq!(info.version, ABCI_VERSION);
        assert_eq!(info.last_block_height, 0);
        assert_eq!(info.last_block_app_hash, [0u8; 32]);

        let state: State = serde_json::from_str(&info.data).unwrap();
        assert_eq!(state, State::default());
    }

    #[test]
    fn test_init_chain_empty_store() {
        let (app, _dir) = test_app();
        assert_eq!(app.init_chain(), [0u8; 32]);
    }
}
