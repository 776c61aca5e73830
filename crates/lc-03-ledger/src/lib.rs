//! # Levy-Chain - Ledger (Subsystem 3)
//!
//! Append-only sequence of proof-of-work sealed blocks. Each block references
//! the prior block's hash and bundles transaction identifiers drained from a
//! FIFO pending pool.
//!
//! ## Lifecycle
//!
//! ```text
//! Ledger::new ──(genesis mined synchronously)──► has-genesis
//!      │
//!      ▼
//! add_pending_transaction* ──► mine_pending_transactions ──► +1 block
//!                                (write lock held through PoW)
//! ```
//!
//! There is no reachable "corrupted" state through the public API. Tampering
//! with stored fields is detected by [`Ledger::validate_chain`], never
//! prevented; validation is diagnostic and the ledger keeps operating.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters: InMemoryArchive                          │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports: LedgerArchive (outbound)                    │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Service: Ledger (chain state + pending pool)       │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain: Block, PoWMiner, DifficultyAdjuster        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Hash integrity**: `block.hash == block.compute_hash()`
//! 2. **Linkage**: `block[i].previous_hash == block[i-1].hash`
//! 3. **Work**: the first `block.difficulty` hex chars of `hash` are `'0'`
//! 4. **Genesis**: index 0, `previous_hash == "0"`, no transactions
//! 5. **Ordering**: pending ids keep insertion order; the reward marker is last
//!
//! ## Known Limitation
//!
//! Proof-of-work runs while holding the ledger's write lock, so balance and
//! chain queries wait for the search to finish.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Archive adapters
pub mod adapters;
/// Domain models and chain logic
pub mod domain;
pub mod ports;
pub mod utils;

mod config;
mod error;
mod metrics;
mod service;

pub use adapters::InMemoryArchive;
pub use config::{LedgerConfig, MAX_DIFFICULTY};
pub use domain::{
    mining_reward_marker, Block, ChainValidation, DifficultyAdjuster, PoWMiner, Seal,
    ViolationKind, GENESIS_PREVIOUS_HASH, MINING_REWARD, MINING_REWARD_PREFIX,
};
pub use error::{ArchiveError, LedgerError, Result};
pub use metrics::LedgerMetrics;
pub use ports::{AuditRecord, LedgerArchive, TransactionRecord};
pub use service::Ledger;

/// Subsystem identifier used in log prefixes
pub const SUBSYSTEM_ID: u8 = 3;
