//! # Ledger Node
//!
//! ## Initialization Order
//!
//! 1. UTXO set
//! 2. Ledger (genesis mined on a blocking thread)
//! 3. Archive
//! 4. Transfer service (UTXO set + ledger + archive)
//! 5. Wallet directory and settlement scheduler

use super::config::{ConfigError, NodeConfig};
use lc_02_utxo_set::UtxoSet;
use lc_03_ledger::{Block, InMemoryArchive, Ledger, LedgerArchive, LedgerError};
use lc_04_transfers::TransferService;
use lc_05_settlement::{SettlementError, SettlementScheduler, UtxoWalletDirectory, WalletDirectory};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors building or driving the node
#[derive(Debug, Error)]
pub enum NodeError {
    /// Configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Ledger construction or mining failed
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Scheduler construction failed
    #[error(transparent)]
    Settlement(#[from] SettlementError),

    /// A blocking task panicked or was cancelled
    #[error("Blocking task failed: {0}")]
    Task(String),
}

/// Every subsystem of one node, constructed once.
pub struct LedgerNode {
    config: NodeConfig,
    utxos: Arc<UtxoSet>,
    ledger: Arc<Ledger>,
    archive: Arc<InMemoryArchive>,
    transfers: Arc<TransferService>,
    settlement: Arc<SettlementScheduler>,
}

impl LedgerNode {
    /// Validate `config` and build every subsystem.
    pub async fn new(config: NodeConfig) -> Result<Self, NodeError> {
        config.validate()?;
        info!("Creating Levy-Chain node (difficulty={})", config.ledger.difficulty);

        let utxos = Arc::new(UtxoSet::new());

        let ledger_config = config.ledger.clone();
        let ledger = tokio::task::spawn_blocking(move || Ledger::new(ledger_config))
            .await
            .map_err(|e| NodeError::Task(e.to_string()))??;
        let ledger = Arc::new(ledger);

        let archive = Arc::new(InMemoryArchive::new());
        let archive_port: Arc<dyn LedgerArchive> = Arc::clone(&archive) as Arc<dyn LedgerArchive>;

        let transfers = Arc::new(TransferService::new(
            Arc::clone(&utxos),
            Arc::clone(&ledger),
            Arc::clone(&archive_port),
        ));

        let directory: Arc<dyn WalletDirectory> =
            Arc::new(UtxoWalletDirectory::new(Arc::clone(&utxos)));
        let settlement = Arc::new(SettlementScheduler::new(
            config.settlement.clone(),
            Arc::clone(&ledger),
            Arc::clone(&utxos),
            directory,
            archive_port,
        )?);

        Ok(Self {
            config,
            utxos,
            ledger,
            archive,
            transfers,
            settlement,
        })
    }

    /// Mine whatever is pending, crediting the configured miner address.
    pub async fn mine_pending(&self) -> Result<Block, NodeError> {
        let ledger = Arc::clone(&self.ledger);
        let miner = self.config.miner_address.clone();
        let block = tokio::task::spawn_blocking(move || ledger.mine_pending_transactions(&miner))
            .await
            .map_err(|e| NodeError::Task(e.to_string()))??;

        if let Err(e) = self.archive.persist_block(&block).await {
            tracing::warn!("Failed to archive block #{}: {}", block.index, e);
        }
        Ok(block)
    }

    /// Node configuration
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// UTXO set handle
    pub fn utxos(&self) -> Arc<UtxoSet> {
        Arc::clone(&self.utxos)
    }

    /// Ledger handle
    pub fn ledger(&self) -> Arc<Ledger> {
        Arc::clone(&self.ledger)
    }

    /// Archive handle
    pub fn archive(&self) -> Arc<InMemoryArchive> {
        Arc::clone(&self.archive)
    }

    /// Transfer service handle
    pub fn transfers(&self) -> Arc<TransferService> {
        Arc::clone(&self.transfers)
    }

    /// Settlement scheduler handle
    pub fn settlement(&self) -> Arc<SettlementScheduler> {
        Arc::clone(&self.settlement)
    }
}
