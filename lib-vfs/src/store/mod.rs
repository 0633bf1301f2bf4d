//! Sled-backed transaction store
//!
//! A prefix-partitioned key-value store holding sealed transactions, the
//! two hash indexes and the application state. Values under `vfs:` are
//! AES-GCM sealed by the caller before they reach the store; the store
//! itself never sees the encryption secret.

pub mod keys;

use std::path::Path;

use thiserror::Error;

use crate::state::State;

/// Storage backend errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database failed
    #[error("database error: {0}")]
    Database(String),

    /// A transaction row already exists under this hash
    #[error("transaction hash already exists")]
    DuplicateHash,

    /// A stored JSON record failed to (de)serialize
    #[error("stored record is corrupted: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<sled::Error> for StoreError {
    fn from(e: sled::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// The node's local transaction store
#[derive(Debug, Clone)]
pub struct VfsStore {
    db: sled::Db,
}

impl VfsStore {
    /// Open or create a store at the given directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref())?;
        tracing::debug!(target: "store", path = %path.as_ref().display(), "opened database");
        Ok(Self { db })
    }

    /// Open a temporary in-memory store; nothing is persisted
    pub fn open_temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Store a sealed transaction under its hash
    ///
    /// Hashes are content addresses: a row, once written, is never
    /// replaced. A second write under the same hash fails with
    /// [`StoreError::DuplicateHash`].
    pub fn put_tx(&self, hash: &[u8], sealed: &[u8]) -> Result<()> {
        let key = keys::tx_key(hash);

        if self.db.contains_key(&key)? {
            return Err(StoreError::DuplicateHash);
        }

        self.db.insert(key, sealed)?;
        Ok(())
    }

    /// Fetch the sealed bytes of a transaction by hash
    pub fn get_tx(&self, hash: &[u8]) -> Result<Option<Vec<u8>>> {
        let value = self.db.get(keys::tx_key(hash))?;
        Ok(value.map(|v| v.to_vec()))
    }

    /// Append a transaction hash to a JSON-array index row
    ///
    /// Read-modify-write; order is insertion order. Duplicates are
    /// permitted but not expected.
    pub fn append_index(&self, key: &[u8], hash: &[u8]) -> Result<()> {
        let mut hashes: Vec<Vec<u8>> = match self.db.get(key)? {
            Some(existing) => serde_json::from_slice(&existing)?,
            None => Vec::new(),
        };

        hashes.push(hash.to_vec());
        self.db.insert(key, serde_json::to_vec(&hashes)?)?;
        Ok(())
    }

    /// Read an index row's raw JSON bytes
    pub fn read_index(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let value = self.db.get(key)?;
        Ok(value.map(|v| v.to_vec()))
    }

    /// Load the application state, or the empty state when none is saved
    pub fn load_state(&self) -> Result<State> {
        match self.db.get(keys::STATE_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(State::default()),
        }
    }

    /// Persist the application state under the well-known key
    pub fn save_state(&self, state: &State) -> Result<()> {
        self.db.insert(keys::STATE_KEY, serde_json::to_vec(state)?)?;
        Ok(())
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> VfsStore {
        VfsStore::open_temporary().unwrap()
    }

    #[test]
    fn test_put_get_tx() {
        let store = temp_store();
        store.put_tx(&[1u8; 32], b"sealed").unwrap();
        assert_eq!(store.get_tx(&[1u8; 32]).unwrap(), Some(b"sealed".to_vec()));
    }

    #[test]
    fn test_get_missing_tx() {
        let store = temp_store();
        assert_eq!(store.get_tx(&[9u8; 32]).unwrap(), None);
    }

    #[test]
    fn test_duplicate_hash_is_fatal() {
        let store = temp_store();
        store.put_tx(&[1u8; 32], b"sealed").unwrap();

        let err = store.put_tx(&[1u8; 32], b"other").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateHash));

        // First write is untouched
        assert_eq!(store.get_tx(&[1u8; 32]).unwrap(), Some(b"sealed".to_vec()));
    }

    #[test]
    fn test_append_index_preserves_order() {
        let store = temp_store();
        let key = keys::height_key(1);

        store.append_index(&key, &[1u8; 32]).unwrap();
        store.append_index(&key, &[2u8; 32]).unwrap();

        let raw = store.read_index(&key).unwrap().unwrap();
        let hashes: Vec<Vec<u8>> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(hashes, vec![vec![1u8; 32], vec![2u8; 32]]);
    }

    #[test]
    fn test_read_missing_index() {
        let store = temp_store();
        assert_eq!(store.read_index(&keys::height_key(5)).unwrap(), None);
    }

    #[test]
    fn test_state_roundtrip() {
        let store = temp_store();

        // Fresh store yields the empty state
        assert_eq!(store.load_state().unwrap(), State::default());

        let mut state = State::default();
        state.height = 4;
        state.num_transactions = 9;
        state.fold_transaction("AA".into(), &[3u8; 32]);

        store.save_state(&state).unwrap();
        assert_eq!(store.load_state().unwrap(), state);
    }

    #[test]
    fn test_tx_rows_and_indexes_do_not_collide() {
        let store = temp_store();
        let hash = [7u8; 32];

        store.put_tx(&hash, b"sealed").unwrap();
        store.append_index(&keys::pubkey_key(&hash), &hash).unwrap();

        // The pubkey index row for these bytes is distinct from the tx row
        assert_eq!(store.get_tx(&hash).unwrap(), Some(b"sealed".to_vec()));
        assert!(store.read_index(&keys::pubkey_key(&hash)).unwrap().is_some());
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();

        {
            let store = VfsStore::open(dir.path()).unwrap();
            store.put_tx(&[1u8; 32], b"sealed").unwrap();
            store.flush().unwrap();
        }

        {
            let store = VfsStore::open(dir.path()).unwrap();
            assert_eq!(store.get_tx(&[1u8; 32]).unwrap(), Some(b"sealed".to_vec()));
        }
    }
}
