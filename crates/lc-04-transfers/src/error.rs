//! Error types for the submission path

use lc_01_transaction::TransactionError;
use lc_02_utxo_set::UtxoError;
use shared_crypto::CryptoError;
use thiserror::Error;

/// Result type alias for transfer operations
pub type Result<T> = std::result::Result<T, TransferError>;

/// Reasons a transfer is rejected.
///
/// Every variant is a validation error: reported to the caller, nothing
/// mutated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Public key or signature could not be decoded
    #[error("Malformed credentials: {0}")]
    MalformedCredentials(#[from] CryptoError),

    /// Signature or sender key check failed
    #[error("Authorization failed: {0}")]
    Authorization(#[from] TransactionError),

    /// Amount is zero or negative
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Rejected amount
        amount: i64,
    },

    /// No inputs were declared
    #[error("Transfer declares no inputs")]
    NoInputs,

    /// Declared inputs do not cover the amount
    #[error("Insufficient inputs: required {required}, provided {provided}")]
    InsufficientInputs {
        /// Requested amount
        required: i64,
        /// Sum of declared inputs
        provided: i64,
    },

    /// Input lookup, ownership or spend failure
    #[error("Input rejected: {0}")]
    Input(#[from] UtxoError),
}

impl TransferError {
    /// Check if the rejection was a double-spend attempt
    pub fn is_double_spend(&self) -> bool {
        matches!(self, Self::Input(err) if err.is_double_spend())
    }

    /// Check if the rejection came from signature or key checks
    pub fn is_authorization_failure(&self) -> bool {
        matches!(
            self,
            Self::Authorization(_) | Self::MalformedCredentials(_)
        )
    }
}
