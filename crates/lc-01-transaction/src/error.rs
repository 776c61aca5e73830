//! Error types for transaction signing and verification

use thiserror::Error;

/// Result type alias for transaction operations
pub type Result<T> = std::result::Result<T, TransactionError>;

/// Errors raised when checking a transaction's authorization fields
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// Public key or signature has not been attached yet
    #[error("Transaction {tx_id} is not signed")]
    Unsigned {
        /// Transaction id
        tx_id: String,
    },

    /// Signature does not verify against the payload
    #[error("Invalid signature on transaction {tx_id}")]
    InvalidSignature {
        /// Transaction id
        tx_id: String,
    },

    /// Sender id is not the wallet id of the attached public key
    #[error("Sender {sender} does not match public key wallet {derived}")]
    SenderKeyMismatch {
        /// Declared sender wallet id
        sender: String,
        /// Wallet id derived from the public key
        derived: String,
    },
}
