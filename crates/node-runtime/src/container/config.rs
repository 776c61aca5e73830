//! # Node Configuration
//!
//! Unified configuration for every subsystem. Sources, lowest precedence
//! first: built-in defaults, an optional JSON file (`LC_CONFIG`), then
//! individual `LC_*` environment variables.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `LC_DIFFICULTY` | `ledger.difficulty` |
//! | `LC_MINING_THREADS` | `ledger.mining_threads` |
//! | `LC_POOL_WALLET` | `settlement.pool_wallet` |
//! | `LC_LEVY_RATE_BPS` | `settlement.levy_rate_bps` |
//! | `LC_SETTLEMENT_INTERVAL_SECS` | `settlement.interval_secs` |
//! | `LC_CHECK_INTERVAL_MS` | `settlement.check_interval_ms` |
//! | `LC_RECONCILE_UTXOS` | `settlement.reconcile_utxos` |
//! | `LC_LOG_LEVEL` | `log_level` |
//! | `LC_MINER_ADDRESS` | `miner_address` |

use lc_03_ledger::LedgerConfig;
use lc_05_settlement::SettlementConfig;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Default tracing filter directive
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Complete node configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Ledger configuration.
    pub ledger: LedgerConfig,
    /// Settlement scheduler configuration.
    pub settlement: SettlementConfig,
    /// Tracing filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Address credited with the reward marker for user-triggered mining.
    pub miner_address: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            settlement: SettlementConfig::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            miner_address: "node-miner".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Ledger section rejected
    #[error("Invalid ledger configuration: {0}")]
    Ledger(String),

    /// Settlement section rejected
    #[error("Invalid settlement configuration: {0}")]
    Settlement(String),

    /// Miner address is empty
    #[error("miner_address must not be empty")]
    EmptyMinerAddress,

    /// Config file could not be read
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema
    #[error("Cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl NodeConfig {
    /// Defaults, then `LC_CONFIG` file if set, then `LC_*` overrides.
    ///
    /// Runs before tracing is installed, so rejected overrides are returned
    /// for the caller to log.
    pub fn from_env() -> Result<(Self, Vec<String>), ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`NodeConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<(Self, Vec<String>), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("LC_CONFIG") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let rejected = config.apply_overrides(lookup);
        Ok((config, rejected))
    }

    /// Parse a JSON config file; missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Apply `LC_*` overrides from `lookup`.
    ///
    /// Unparsable values are skipped; one `KEY=value` entry is returned for
    /// each.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rejected = Vec::new();
        override_parsed(&lookup, "LC_DIFFICULTY", &mut self.ledger.difficulty, &mut rejected);
        override_parsed(
            &lookup,
            "LC_MINING_THREADS",
            &mut self.ledger.mining_threads,
            &mut rejected,
        );
        override_parsed(
            &lookup,
            "LC_LEVY_RATE_BPS",
            &mut self.settlement.levy_rate_bps,
            &mut rejected,
        );
        override_parsed(
            &lookup,
            "LC_SETTLEMENT_INTERVAL_SECS",
            &mut self.settlement.interval_secs,
            &mut rejected,
        );
        override_parsed(
            &lookup,
            "LC_CHECK_INTERVAL_MS",
            &mut self.settlement.check_interval_ms,
            &mut rejected,
        );
        override_parsed(
            &lookup,
            "LC_RECONCILE_UTXOS",
            &mut self.settlement.reconcile_utxos,
            &mut rejected,
        );

        if let Some(pool) = lookup("LC_POOL_WALLET") {
            self.settlement.pool_wallet = pool;
        }
        if let Some(level) = lookup("LC_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(miner) = lookup("LC_MINER_ADDRESS") {
            self.miner_address = miner;
        }
        rejected
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ledger.validate().map_err(ConfigError::Ledger)?;
        self.settlement
            .validate()
            .map_err(ConfigError::Settlement)?;
        if self.miner_address.trim().is_empty() {
            return Err(ConfigError::EmptyMinerAddress);
        }
        Ok(())
    }
}

fn override_parsed<T, F>(lookup: &F, key: &str, target: &mut T, rejected: &mut Vec<String>)
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => rejected.push(format!("{}={:?}", key, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_is_valid() {
        assert!(NodeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = NodeConfig::default();
        config.apply_overrides(lookup(&[
            ("LC_DIFFICULTY", "2"),
            ("LC_MINING_THREADS", "3"),
            ("LC_POOL_WALLET", "pool-x"),
            ("LC_LEVY_RATE_BPS", "500"),
            ("LC_SETTLEMENT_INTERVAL_SECS", "60"),
            ("LC_CHECK_INTERVAL_MS", "250"),
            ("LC_RECONCILE_UTXOS", "false"),
            ("LC_MINER_ADDRESS", "miner-1"),
        ]));

        assert_eq!(config.ledger.difficulty, 2);
        assert_eq!(config.ledger.mining_threads, 3);
        assert_eq!(config.settlement.pool_wallet, "pool-x");
        assert_eq!(config.settlement.levy_rate_bps, 500);
        assert_eq!(config.settlement.interval_secs, 60);
        assert_eq!(config.settlement.check_interval_ms, 250);
        assert!(!config.settlement.reconcile_utxos);
        assert_eq!(config.miner_address, "miner-1");
    }

    #[test]
    fn test_unparsable_override_ignored() {
        let mut config = NodeConfig::default();
        let before = config.ledger.difficulty;
        let rejected = config.apply_overrides(lookup(&[("LC_DIFFICULTY", "hard")]));
        assert_eq!(config.ledger.difficulty, before);
        assert_eq!(rejected, vec![r#"LC_DIFFICULTY="hard""#.to_string()]);
    }

    fn write_config(name: &str, body: &str) -> String {
        let path = std::env::temp_dir().join(format!(
            "levy-chain-{}-{}.json",
            name,
            std::process::id()
        ));
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_file_log_level_used() {
        let path = write_config("log-level", r#"{"log_level": "lc_05_settlement=debug"}"#);

        let (config, rejected) = NodeConfig::from_lookup(lookup(&[("LC_CONFIG", path.as_str())])).unwrap();
        assert_eq!(config.log_level, "lc_05_settlement=debug");
        assert!(rejected.is_empty());

        let (config, _) = NodeConfig::from_lookup(lookup(&[
            ("LC_CONFIG", path.as_str()),
            ("LC_LOG_LEVEL", "warn"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, "warn");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_lookup_without_file_uses_defaults() {
        let (config, _) = NodeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = NodeConfig::default();
        config.ledger.difficulty = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Ledger(_))));

        let mut config = NodeConfig::default();
        config.settlement.levy_rate_bps = 20_000;
        assert!(matches!(config.validate(), Err(ConfigError::Settlement(_))));

        let mut config = NodeConfig::default();
        config.miner_address = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyMinerAddress)
        ));
    }

    #[test]
    fn test_partial_json() {
        let config: NodeConfig = serde_json::from_str(
            r#"{"ledger": {"difficulty": 3}, "settlement": {"pool_wallet": "p"}}"#,
        )
        .unwrap();
        assert_eq!(config.ledger.difficulty, 3);
        assert_eq!(config.settlement.pool_wallet, "p");
        assert_eq!(config.settlement.levy_rate_bps, 250);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            NodeConfig::from_file("/nonexistent/levy-chain.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
