//! Domain entities for the ledger

use crate::utils::hashing::{hash_with_nonce, meets_difficulty, serialize_block_prefix};
use serde::{Deserialize, Serialize};

/// Prefix of the synthetic identifier appended to every mined block
pub const MINING_REWARD_PREFIX: &str = "MINING_REWARD:";

/// Nominal reward reported for a mined block. The marker moves no value.
pub const MINING_REWARD: i64 = 10;

/// `previous_hash` of the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Reward marker for a miner address
pub fn mining_reward_marker(miner_address: &str) -> String {
    format!("{}{}", MINING_REWARD_PREFIX, miner_address)
}

/// A proof-of-work sealed block of transaction identifiers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, genesis is 0
    pub index: u64,

    /// Unix timestamp (seconds)
    pub timestamp: i64,

    /// Transaction ids in inclusion order, reward marker last
    pub transaction_ids: Vec<String>,

    /// Hash of the prior block ("0" for genesis)
    pub previous_hash: String,

    /// Lowercase hex SHA-256 of the other fields
    pub hash: String,

    /// Proof-of-work nonce
    pub nonce: u64,

    /// Leading '0' characters required of `hash`
    pub difficulty: u32,
}

impl Block {
    /// Unsealed candidate: nonce 0, empty hash
    pub fn candidate(
        index: u64,
        timestamp: i64,
        transaction_ids: Vec<String>,
        previous_hash: impl Into<String>,
        difficulty: u32,
    ) -> Self {
        Self {
            index,
            timestamp,
            transaction_ids,
            previous_hash: previous_hash.into(),
            hash: String::new(),
            nonce: 0,
            difficulty,
        }
    }

    /// Unsealed genesis candidate
    pub fn genesis_candidate(timestamp: i64, difficulty: u32) -> Self {
        Self::candidate(0, timestamp, Vec::new(), GENESIS_PREVIOUS_HASH, difficulty)
    }

    /// Serialized fields before the nonce
    pub fn hash_prefix(&self) -> Vec<u8> {
        serialize_block_prefix(
            self.index,
            self.timestamp,
            &self.transaction_ids,
            &self.previous_hash,
        )
    }

    /// Recompute the hash from the current field values
    pub fn compute_hash(&self) -> String {
        hash_with_nonce(&self.hash_prefix(), self.nonce, self.difficulty)
    }

    /// Whether the stored hash satisfies the recorded difficulty
    pub fn meets_difficulty(&self) -> bool {
        meets_difficulty(&self.hash, self.difficulty)
    }

    /// Whether this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

/// Kind of integrity violation found by chain validation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Stored hash differs from the recomputed hash
    HashMismatch,
    /// `previous_hash` differs from the prior block's hash
    BrokenLink,
    /// Hash lacks the recorded number of leading zeros
    InsufficientWork,
}

/// Outcome of walking the chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainValidation {
    /// Every block checked out
    Valid,
    /// First violation found
    Invalid {
        /// Index of the offending block
        index: u64,
        /// What was wrong with it
        kind: ViolationKind,
    },
}

impl ChainValidation {
    /// Whether the chain is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}
