//! Configuration types for the ledger

use serde::Deserialize;

/// Highest difficulty expressible with a 64-char hex hash
pub const MAX_DIFFICULTY: u32 = 64;

/// Runtime configuration for the ledger
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Leading '0' hex characters required of every block hash
    pub difficulty: u32,

    /// Number of nonce-search threads (default: num_cpus)
    pub mining_threads: usize,

    /// Target seconds between blocks for difficulty adjustment
    pub target_block_time_secs: i64,

    /// Number of block intervals averaged by difficulty adjustment
    pub adjustment_window: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: 4,
            mining_threads: num_cpus::get().max(1),
            target_block_time_secs: 10,
            adjustment_window: 10,
        }
    }
}

impl LedgerConfig {
    /// Config for a given difficulty, other fields default
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.difficulty == 0 {
            return Err("difficulty must be at least 1".to_string());
        }
        if self.difficulty > MAX_DIFFICULTY {
            return Err(format!(
                "difficulty {} exceeds maximum {}",
                self.difficulty, MAX_DIFFICULTY
            ));
        }
        if self.mining_threads == 0 {
            return Err("mining_threads must be at least 1".to_string());
        }
        if self.target_block_time_secs <= 0 {
            return Err("target_block_time_secs must be positive".to_string());
        }
        if self.adjustment_window == 0 {
            return Err("adjustment_window must be at least 1".to_string());
        }
        Ok(())
    }
}
