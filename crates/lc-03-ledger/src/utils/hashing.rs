//! Block hashing
//!
//! Canonical encoding, fields in order:
//!
//! | Field | Encoding |
//! |-------|----------|
//! | index | u64 LE |
//! | timestamp | i64 LE |
//! | transaction_ids | u64 LE count, then each as u64 LE length + UTF-8 bytes |
//! | previous_hash | u64 LE length + UTF-8 bytes |
//! | nonce | u64 LE |
//! | difficulty | u32 LE |
//!
//! Length prefixes keep `["ab", "c"]` and `["a", "bc"]` distinct.
//! The nonce and difficulty come last so the miner can serialize the
//! prefix once and append them per attempt.

use shared_crypto::Sha256Hasher;

fn put_str(bytes: &mut Vec<u8>, s: &str) {
    bytes.extend_from_slice(&(s.len() as u64).to_le_bytes());
    bytes.extend_from_slice(s.as_bytes());
}

/// Serialize everything before the nonce.
pub fn serialize_block_prefix(
    index: u64,
    timestamp: i64,
    transaction_ids: &[String],
    previous_hash: &str,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(96 + transaction_ids.len() * 72);

    bytes.extend_from_slice(&index.to_le_bytes());
    bytes.extend_from_slice(&timestamp.to_le_bytes());
    bytes.extend_from_slice(&(transaction_ids.len() as u64).to_le_bytes());
    for id in transaction_ids {
        put_str(&mut bytes, id);
    }
    put_str(&mut bytes, previous_hash);

    bytes
}

/// Hash a serialized prefix with a candidate nonce and difficulty.
#[inline]
pub fn hash_with_nonce(prefix: &[u8], nonce: u64, difficulty: u32) -> String {
    let mut hasher = Sha256Hasher::new();
    hasher
        .update(prefix)
        .update(&nonce.to_le_bytes())
        .update(&difficulty.to_le_bytes());
    hasher.finalize_hex()
}

/// Check that the first `difficulty` characters of `hash` are all '0'.
#[inline]
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let required = difficulty as usize;
    hash.len() >= required && hash.as_bytes()[..required].iter().all(|&b| b == b'0')
}
