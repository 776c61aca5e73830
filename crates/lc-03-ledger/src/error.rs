//! Error types for the ledger subsystem

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while building or mining the chain
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Nonce space exhausted without a valid hash
    #[error("Mining failed: no valid nonce found at difficulty {difficulty}")]
    MiningFailed {
        /// Difficulty the search ran at
        difficulty: u32,
    },

    /// No block at this index
    #[error("Block not found at index {index}")]
    BlockNotFound {
        /// Requested index
        index: u64,
    },
}

impl LedgerError {
    /// Check if error is critical (the ledger cannot make progress)
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::InvalidConfig(_) | Self::MiningFailed { .. })
    }
}

/// Errors raised by archive adapters.
///
/// Archive writes are best-effort: callers log these and carry on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// Backing store rejected the write
    #[error("Archive write failed: {0}")]
    WriteFailed(String),

    /// Record could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ArchiveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
