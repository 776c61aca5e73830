//! In-process wallet directories

use crate::error::DirectoryError;
use crate::ports::{WalletBalance, WalletDirectory};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lc_02_utxo_set::UtxoSet;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Directory over a fixed, replaceable list of balances.
///
/// Useful where balances come from outside the UTXO set, and for exercising
/// the enumeration failure path.
#[derive(Default)]
pub struct StaticWalletDirectory {
    balances: RwLock<Vec<WalletBalance>>,
    last_settlement: RwLock<Option<DateTime<Utc>>>,
    unavailable: AtomicBool,
}

impl StaticWalletDirectory {
    /// Create a directory with the given rows
    pub fn new(balances: Vec<WalletBalance>) -> Self {
        Self {
            balances: RwLock::new(balances),
            ..Self::default()
        }
    }

    /// Replace every row
    pub fn set_balances(&self, balances: Vec<WalletBalance>) {
        *self.balances.write() = balances;
    }

    /// Make enumeration fail (or succeed again)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    /// Seed the stored settlement timestamp
    pub fn set_last_settlement(&self, at: Option<DateTime<Utc>>) {
        *self.last_settlement.write() = at;
    }
}

#[async_trait]
impl WalletDirectory for StaticWalletDirectory {
    async fn all_wallet_balances(&self) -> Result<Vec<WalletBalance>, DirectoryError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(DirectoryError::Unavailable("wallet store offline".to_string()));
        }
        Ok(self.balances.read().clone())
    }

    async fn last_settlement(&self) -> Result<Option<DateTime<Utc>>, DirectoryError> {
        Ok(*self.last_settlement.read())
    }

    async fn record_settlement(&self, at: DateTime<Utc>) -> Result<(), DirectoryError> {
        *self.last_settlement.write() = Some(at);
        Ok(())
    }
}

/// Directory that derives balances from the UTXO set.
pub struct UtxoWalletDirectory {
    utxos: Arc<UtxoSet>,
    last_settlement: RwLock<Option<DateTime<Utc>>>,
}

impl UtxoWalletDirectory {
    /// Wrap a UTXO set
    pub fn new(utxos: Arc<UtxoSet>) -> Self {
        Self {
            utxos,
            last_settlement: RwLock::new(None),
        }
    }
}

#[async_trait]
impl WalletDirectory for UtxoWalletDirectory {
    async fn all_wallet_balances(&self) -> Result<Vec<WalletBalance>, DirectoryError> {
        Ok(self
            .utxos
            .balances()
            .into_iter()
            .map(|(wallet_id, balance)| WalletBalance { wallet_id, balance })
            .collect())
    }

    async fn last_settlement(&self) -> Result<Option<DateTime<Utc>>, DirectoryError> {
        Ok(*self.last_settlement.read())
    }

    async fn record_settlement(&self, at: DateTime<Utc>) -> Result<(), DirectoryError> {
        *self.last_settlement.write() = Some(at);
        Ok(())
    }
}
