//! Settlement pass results

use chrono::{DateTime, Utc};
use lc_03_ledger::Block;
use serde::Serialize;

/// Levy computed for one wallet
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LevyEntry {
    /// Levied wallet
    pub wallet_id: String,
    /// Balance the levy was computed from
    pub balance: i64,
    /// Levy amount
    pub amount: i64,
    /// Levy transaction id
    pub tx_id: String,
}

/// Outcome of one settlement pass
#[derive(Clone, Debug, Serialize)]
pub struct SettlementReport {
    /// When the pass started
    pub ran_at: DateTime<Utc>,
    /// One entry per levied wallet, in enumeration order
    pub levies: Vec<LevyEntry>,
    /// Sum of all levies
    pub total_levied: i64,
    /// Settlement block, absent when nothing was levied
    pub block: Option<Block>,
    /// Wallets passed over (zero levy, malformed row, or unfunded)
    pub skipped: usize,
}

impl SettlementReport {
    /// Whether a settlement block was mined
    pub fn mined(&self) -> bool {
        self.block.is_some()
    }
}
