//! Domain layer - pure chain logic
//!
//! - [`Block`]: sealed block of transaction ids
//! - [`PoWMiner`]: parallel nonce search
//! - [`DifficultyAdjuster`]: step rule over recent block times
//!
//! Nothing here locks or performs I/O; [`crate::Ledger`] owns the state.

pub mod difficulty;
mod entities;
pub mod miner;

pub use difficulty::DifficultyAdjuster;
pub use entities::*;
pub use miner::{PoWMiner, Seal};
