//! Outbound ports (driven side - SPI)

use crate::error::DirectoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the wallet enumeration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    /// Wallet id
    pub wallet_id: String,
    /// Current balance
    pub balance: i64,
}

impl WalletBalance {
    /// Create a row
    pub fn new(wallet_id: impl Into<String>, balance: i64) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            balance,
        }
    }
}

/// Port: funding/account store consulted by the scheduler
#[async_trait]
pub trait WalletDirectory: Send + Sync {
    /// Every known wallet with its current balance
    async fn all_wallet_balances(&self) -> Result<Vec<WalletBalance>, DirectoryError>;

    /// When the last settlement pass completed, if ever
    async fn last_settlement(&self) -> Result<Option<DateTime<Utc>>, DirectoryError>;

    /// Record a completed settlement pass
    async fn record_settlement(&self, at: DateTime<Utc>) -> Result<(), DirectoryError>;
}
