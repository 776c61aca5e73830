//! # SHA-256 Hashing
//!
//! One-shot and streaming SHA-256. All hashes that leave this crate as
//! strings are lowercase hex of the 32-byte digest.

use sha2::{Digest, Sha256};

/// SHA-256 output (256-bit).
pub type Hash = [u8; 32];

/// Stateful SHA-256 hasher.
#[derive(Clone, Default)]
pub struct Sha256Hasher {
    inner: Sha256,
}

impl Sha256Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> Hash {
        let mut output = [0u8; 32];
        output.copy_from_slice(&self.inner.finalize());
        output
    }

    /// Finalize and return the lowercase hex encoding.
    pub fn finalize_hex(self) -> String {
        hex::encode(self.finalize())
    }
}

/// Hash data with SHA-256 (one-shot).
#[inline]
pub fn sha256(data: &[u8]) -> Hash {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(data));
    output
}

/// Hash data with SHA-256 and hex-encode the digest.
#[inline]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
