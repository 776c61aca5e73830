//! # Levy-Chain - Settlement Scheduler (Subsystem 5)
//!
//! Background process that periodically charges a percentage levy against
//! every wallet balance, synthesizes one system transaction per levied wallet
//! and mines the whole batch into a single block credited to the pool wallet.
//!
//! ## Pass
//!
//! ```text
//! all_wallet_balances()          ── failure aborts the pass, nothing mined
//!   │ skip pool wallet, malformed rows, levy == 0
//!   │ levy = floor(balance * bps / 10000)
//!   │ reconcile_utxos: select inputs, spend, pool output (+ change)
//!   ▼
//! levy tx ids ──► Ledger pending pool
//!   ▼
//! one mine_pending_transactions(pool)      (skipped when nothing levied)
//!   ▼
//! archive block + audit + record timestamp (best-effort)
//! ```
//!
//! ## Scheduling
//!
//! [`SettlementScheduler::start`] spawns a loop that wakes every
//! `check_interval` and runs a pass once `interval` has elapsed since the last
//! run. [`SettlementScheduler::stop`] takes effect before the next tick; a
//! pass already in progress is not interrupted. Passes never overlap:
//! the background loop and [`SettlementScheduler::trigger_now`] share one
//! async mutex.
//!
//! ## Value movement
//!
//! With `reconcile_utxos = false` levy transactions only add identifiers to
//! the pending pool and move no UTXO value. The default (`true`) spends the
//! wallet's outputs and credits the pool; wallets whose outputs cannot cover
//! the levy are skipped for that pass.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Wallet directory adapters
pub mod adapters;
pub mod ports;

mod config;
mod error;
mod report;
mod service;

pub use adapters::{StaticWalletDirectory, UtxoWalletDirectory};
pub use config::{
    compute_levy, SettlementConfig, BPS_DENOMINATOR, DEFAULT_CHECK_INTERVAL_MS,
    DEFAULT_INTERVAL_SECS, DEFAULT_NOTE,
};
pub use error::{DirectoryError, Result, SettlementError};
pub use ports::{WalletBalance, WalletDirectory};
pub use report::{LevyEntry, SettlementReport};
pub use service::SettlementScheduler;
