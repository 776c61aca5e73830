//! Utility functions for the ledger

pub mod hashing;
