//! Wallet directory adapters

pub mod directory;

pub use directory::{StaticWalletDirectory, UtxoWalletDirectory};
