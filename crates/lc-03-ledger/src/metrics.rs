//! Metrics collection for the ledger

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for mining
#[derive(Debug, Default)]
pub struct LedgerMetrics {
    /// Total blocks mined (genesis included)
    pub blocks_mined: AtomicU64,

    /// Total transaction ids included, reward markers included
    pub transactions_included: AtomicU64,

    /// Total PoW mining time (milliseconds)
    pub mining_time_ms: AtomicU64,

    /// Nonce of the most recently mined block
    pub last_nonce: AtomicU64,
}

impl LedgerMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mined block
    pub fn record_block_mined(&self, tx_count: usize, nonce: u64, duration_ms: u64) {
        self.blocks_mined.fetch_add(1, Ordering::Relaxed);
        self.transactions_included
            .fetch_add(tx_count as u64, Ordering::Relaxed);
        self.mining_time_ms.fetch_add(duration_ms, Ordering::Relaxed);
        self.last_nonce.store(nonce, Ordering::Relaxed);
    }

    /// Get blocks mined
    pub fn get_blocks_mined(&self) -> u64 {
        self.blocks_mined.load(Ordering::Relaxed)
    }

    /// Get transaction ids included
    pub fn get_transactions_included(&self) -> u64 {
        self.transactions_included.load(Ordering::Relaxed)
    }

    /// Get nonce of the last mined block
    pub fn get_last_nonce(&self) -> u64 {
        self.last_nonce.load(Ordering::Relaxed)
    }

    /// Get average mining time per block (milliseconds)
    pub fn get_avg_mining_time(&self) -> f64 {
        let blocks = self.blocks_mined.load(Ordering::Relaxed);
        if blocks == 0 {
            return 0.0;
        }
        let time = self.mining_time_ms.load(Ordering::Relaxed);
        time as f64 / blocks as f64
    }
}
