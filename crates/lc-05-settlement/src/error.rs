//! Error types for the settlement subsystem

use lc_03_ledger::LedgerError;
use thiserror::Error;

/// Result type alias for settlement operations
pub type Result<T> = std::result::Result<T, SettlementError>;

/// Errors raised by wallet directory adapters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Backing store could not be reached
    #[error("Wallet directory unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during a settlement pass
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Wallet enumeration or timestamp lookup failed
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Mining the settlement block failed
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The blocking mining task panicked or was cancelled
    #[error("Mining task failed: {0}")]
    MiningTask(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// `start` was called outside a Tokio runtime
    #[error("No Tokio runtime available")]
    NoRuntime,
}

impl SettlementError {
    /// Check if the error aborted a pass (as opposed to a setup failure)
    pub fn is_fatal_to_pass(&self) -> bool {
        matches!(
            self,
            Self::Directory(_) | Self::Ledger(_) | Self::MiningTask(_)
        )
    }
}
