//! Error types for the UTXO set

use thiserror::Error;

/// Result type alias for UTXO operations
pub type Result<T> = std::result::Result<T, UtxoError>;

/// Errors returned by UTXO set operations.
///
/// None of these leave the set partially mutated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UtxoError {
    /// No output with this id exists
    #[error("UTXO not found: {id}")]
    NotFound {
        /// Requested output id
        id: String,
    },

    /// Claimed owner differs from the recorded owner
    #[error("UTXO {id} is owned by {owner}, not {claimed}")]
    OwnerMismatch {
        /// Output id
        id: String,
        /// Recorded owner
        owner: String,
        /// Owner claimed by the caller
        claimed: String,
    },

    /// Output was already spent (double-spend attempt)
    #[error("UTXO already spent: {id}")]
    AlreadySpent {
        /// Output id
        id: String,
    },

    /// Same output listed twice in one spend request
    #[error("UTXO listed more than once: {id}")]
    DuplicateInput {
        /// Output id
        id: String,
    },

    /// Negative output amount
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Rejected amount
        amount: i64,
    },

    /// An output with this id already exists
    #[error("Duplicate output id: {id}")]
    DuplicateOutput {
        /// Output id
        id: String,
    },

    /// Unspent outputs do not cover the requested amount
    #[error("Insufficient funds for {owner}: required {required}, available {available}")]
    InsufficientFunds {
        /// Wallet id
        owner: String,
        /// Requested amount
        required: i64,
        /// Spendable balance
        available: i64,
    },

    /// Summed amounts exceed the i64 range
    #[error("Amount overflow")]
    Overflow,
}

impl UtxoError {
    /// Check if the error is a double-spend attempt (kept distinct for auditing)
    pub fn is_double_spend(&self) -> bool {
        matches!(self, Self::AlreadySpent { .. } | Self::DuplicateInput { .. })
    }

    /// Check if the error is an ownership violation
    pub fn is_ownership_violation(&self) -> bool {
        matches!(self, Self::OwnerMismatch { .. })
    }
}
