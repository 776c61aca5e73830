//! Configuration types for settlement

use serde::Deserialize;
use std::time::Duration;

/// Basis points in 100%
pub const BPS_DENOMINATOR: u32 = 10_000;

/// 30 days
pub const DEFAULT_INTERVAL_SECS: u64 = 30 * 24 * 60 * 60;

/// One hour
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 60 * 60 * 1000;

/// Note attached to levy transactions; independent of the configured rate
pub const DEFAULT_NOTE: &str = "Periodic settlement levy";

/// Runtime configuration for the settlement scheduler
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Levy rate in basis points (250 = 2.5%)
    pub levy_rate_bps: u32,

    /// Wallet receiving levies; never levied itself
    pub pool_wallet: String,

    /// Minimum time between passes of the background loop (seconds)
    pub interval_secs: u64,

    /// How often the background loop checks whether a pass is due (ms)
    pub check_interval_ms: u64,

    /// Note attached to every levy transaction
    pub note: String,

    /// Move UTXO value for each levy instead of only recording ids
    pub reconcile_utxos: bool,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            levy_rate_bps: 250,
            pool_wallet: "settlement-pool".to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            note: DEFAULT_NOTE.to_string(),
            reconcile_utxos: true,
        }
    }
}

impl SettlementConfig {
    /// Minimum time between passes
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Background check cadence
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.levy_rate_bps > BPS_DENOMINATOR {
            return Err(format!(
                "levy_rate_bps {} exceeds {}",
                self.levy_rate_bps, BPS_DENOMINATOR
            ));
        }
        if self.pool_wallet.trim().is_empty() {
            return Err("pool_wallet must not be empty".to_string());
        }
        if self.interval_secs == 0 {
            return Err("interval_secs must be positive".to_string());
        }
        if self.check_interval_ms == 0 {
            return Err("check_interval_ms must be positive".to_string());
        }
        Ok(())
    }
}

/// `floor(balance * bps / 10000)`; zero for non-positive balances.
pub fn compute_levy(balance: i64, levy_rate_bps: u32) -> i64 {
    if balance <= 0 {
        return 0;
    }
    let levy = balance as i128 * levy_rate_bps as i128 / BPS_DENOMINATOR as i128;
    // levy <= balance whenever the rate is at most 100%
    i64::try_from(levy).unwrap_or(balance)
}
