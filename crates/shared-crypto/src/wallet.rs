//! Wallet identifiers.
//!
//! A wallet id is `hex(SHA-256(public key bytes))`: 64 lowercase hex chars.

use crate::hashing::sha256_hex;
use crate::signatures::Ed25519PublicKey;

/// Length of a wallet identifier in hex characters.
pub const WALLET_ID_LEN: usize = 64;

/// Derive the canonical wallet identifier for a public key.
pub fn wallet_id(public_key: &Ed25519PublicKey) -> String {
    sha256_hex(public_key.as_bytes())
}

/// Check the shape of a wallet identifier (64 lowercase hex chars).
///
/// System wallets such as the settlement pool may use free-form names, so
/// this is only applied where an id must have been derived from a key.
pub fn is_valid_wallet_id(candidate: &str) -> bool {
    candidate.len() == WALLET_ID_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
