//! Key encoding helpers
//!
//! Key layout is PROTOCOL. These functions define the canonical byte
//! layout for every storage key; never inline key construction in
//! business logic.
//!
//! # Layout
//!
//! | Prefix          | Suffix                  | Value                    |
//! |-----------------|-------------------------|--------------------------|
//! | `vfs:`          | 32-byte tx hash         | sealed transaction bytes |
//! | `vfs:height:`   | ASCII decimal height    | JSON array of tx hashes  |
//! | `vfs:pubkey:`   | raw 32-byte public key  | JSON array of tx hashes  |
//! | (none)          | `vfsState`              | JSON application state   |
//!
//! The index prefixes nest under `vfs:` by string; nothing iterates with
//! the bare `vfs:` prefix, so the overlap is harmless and kept for
//! layout compatibility.

/// Well-known key of the persisted application state
pub const STATE_KEY: &[u8] = b"vfsState";

/// Prefix of sealed transaction rows
pub const TX_PREFIX: &[u8] = b"vfs:";

/// Prefix of the by-height hash index
pub const HEIGHT_PREFIX: &[u8] = b"vfs:height:";

/// Prefix of the by-signer hash index
pub const PUBKEY_PREFIX: &[u8] = b"vfs:pubkey:";

/// Key for a sealed transaction row: `vfs:` ‖ hash
#[inline]
pub fn tx_key(hash: &[u8]) -> Vec<u8> {
    prefixed(TX_PREFIX, hash)
}

/// Key for the by-height index: `vfs:height:` ‖ ASCII decimal height
#[inline]
pub fn height_key(height: i64) -> Vec<u8> {
    prefixed(HEIGHT_PREFIX, height.to_string().as_bytes())
}

/// Key for the by-signer index: `vfs:pubkey:` ‖ raw public key
#[inline]
pub fn pubkey_key(pubkey: &[u8]) -> Vec<u8> {
    prefixed(PUBKEY_PREFIX, pubkey)
}

/// Concatenate a prefix and a caller-supplied suffix
///
/// Query paths hand the suffix through untouched, so lookups use the
/// exact same bytes a commit wrote.
#[inline]
pub fn prefixed(prefix: &[u8], suffix: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + suffix.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(suffix);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_key_layout() {
        let key = tx_key(&[0xab; 32]);
        assert!(key.starts_with(b"vfs:"));
        assert_eq!(key.len(), 4 + 32);
        assert_eq!(&key[4..], &[0xab; 32]);
    }

    #[test]
    fn test_height_key_is_ascii_decimal() {
        assert_eq!(height_key(0), b"vfs:height:0".to_vec());
        assert_eq!(height_key(42), b"vfs:height:42".to_vec());
        assert_eq!(height_key(1_000_000), b"vfs:height:1000000".to_vec());
    }

    #[test]
    fn test_pubkey_key_layout() {
        let key = pubkey_key(&[0x11; 32]);
        assert!(key.starts_with(b"vfs:pubkey:"));
        assert_eq!(key.len(), 11 + 32);
    }

    #[test]
    fn test_prefixed_matches_named_builders() {
        assert_eq!(prefixed(HEIGHT_PREFIX, b"7"), height_key(7));
        assert_eq!(prefixed(PUBKEY_PREFIX, &[9u8; 32]), pubkey_key(&[9u8; 32]));
        assert_eq!(prefixed(TX_PREFIX, &[1u8; 32]), tx_key(&[1u8; 32]));
    }

    #[test]
    fn test_keys_are_distinct_per_keyspace() {
        // A 32-byte hash row can never collide with the state key or an
        // index row for another keyspace
        let tx = tx_key(&[0u8; 32]);
        let height = height_key(0);
        let pubkey = pubkey_key(&[0u8; 32]);
        assert_ne!(tx, height);
        assert_ne!(tx, pubkey);
        assert_ne!(height, pubkey);
        assert_ne!(tx, STATE_KEY.to_vec());
    }
}
