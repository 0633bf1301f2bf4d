//! Application state
//!
//! The state is what every replica must agree on: the latest finalized
//! height, the all-time transaction counter and one merkle root per
//! signer. The app-hash derives from the roots alone; the counter and
//! height ride along in the persisted JSON for operators and replay.

pub mod merkle;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use merkle::merkle_root;

/// The replicated application state
///
/// `merkle_roots` maps the uppercase-hex signer key to that signer's
/// current 32-byte commitment. A `BTreeMap` keeps key order
/// deterministic both for the app-hash and for the serialized JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Most recent finalized block height; only grows
    pub height: i64,

    /// Total number of staged transactions across all history; only grows
    pub num_transactions: i64,

    /// Per-signer merkle commitments over transaction hashes
    pub merkle_roots: BTreeMap<String, Vec<u8>>,
}

impl State {
    /// The merkle root values in lexicographic signer-key order
    ///
    /// Sorting over the uppercase-hex keys equals sorting over the raw
    /// public key bytes, so every replica produces the same sequence.
    pub fn sorted_roots(&self) -> Vec<Vec<u8>> {
        self.merkle_roots.values().cloned().collect()
    }

    /// The app-hash: merkle root over all signers' commitments
    ///
    /// 32 zero bytes for an empty store.
    pub fn app_hash(&self) -> [u8; 32] {
        merkle_root(&self.sorted_roots())
    }

    /// Fold one transaction hash into its signer's commitment
    ///
    /// `root' = merkle_root([root, hash])` when the signer is known,
    /// `merkle_root([hash])` otherwise. Must be applied in staging order.
    pub fn fold_transaction(&mut self, signer_hex: String, tx_hash: &[u8]) {
        let mut leaves = Vec::with_capacity(2);
        if let Some(previous) = self.merkle_roots.get(&signer_hex) {
            leaves.push(previous.clone());
        }
        leaves.push(tx_hash.to_vec());

        let root = merkle_root(&leaves);
        self.merkle_roots.insert(signer_hex, root.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_app_hash_is_zero() {
        assert_eq!(State::default().app_hash(), [0u8; 32]);
    }

    #[test]
    fn test_fold_first_transaction() {
        let mut state = State::default();
        state.fold_transaction("AA".into(), &[1u8; 32]);

        let expected = merkle_root(&[vec![1u8; 32]]);
        assert_eq!(state.merkle_roots["AA"], expected.to_vec());
    }

    #[test]
    fn test_fold_chains_previous_root() {
        let mut state = State::default();
        state.fold_transaction("AA".into(), &[1u8; 32]);
        state.fold_transaction("AA".into(), &[2u8; 32]);

        let first = merkle_root(&[vec![1u8; 32]]);
        let expected = merkle_root(&[first.to_vec(), vec![2u8; 32]]);
        assert_eq!(state.merkle_roots["AA"], expected.to_vec());
    }

    #[test]
    fn test_sorted_roots_follow_key_order() {
        let mut state = State::default();
        state.fold_transaction("BB".into(), &[2u8; 32]);
        state.fold_transaction("AA".into(), &[1u8; 32]);

        let roots = state.sorted_roots();
        assert_eq!(roots[0], state.merkle_roots["AA"]);
        assert_eq!(roots[1], state.merkle_roots["BB"]);
    }

    #[test]
    fn test_app_hash_covers_sorted_values() {
        let mut state = State::default();
        state.fold_transaction("BB".into(), &[2u8; 32]);
        state.fold_transaction("AA".into(), &[1u8; 32]);

        assert_eq!(state.app_hash(), merkle_root(&state.sorted_roots()));
    }

    #[test]
    fn test_state_json_layout() {
        let mut state = State::default();
        state.height = 3;
        state.num_transactions = 2;
        state.fold_transaction("AA".into(), &[1u8; 32]);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["height"], 3);
        assert_eq!(json["num_transactions"], 2);
        assert!(json["merkle_roots"]["AA"].is_array());
    }

    #[test]
    fn test_state_json_roundtrip() {
        let mut state = State::default();
        state.height = 7;
        state.num_transactions = 11;
        state.fold_transaction("AA".into(), &[1u8; 32]);
        state.fold_transaction("BB".into(), &[2u8; 32]);

        let json = serde_json::to_string(&state).unwrap();
        let restored: State = serde_json::from_str(&json).unwrap();
        assert_eq!(state, restored);
    }
}
