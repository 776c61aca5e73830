//! # Levy-Chain - Transaction (Subsystem 1)
//!
//! A [`Transaction`] is a data carrier for a value-transfer intent. It stamps
//! its creation time, derives a deterministic identifier from its content and
//! exposes the exact byte payload that must be signed.
//!
//! ## Identity
//!
//! ```text
//! payload = "{sender}|{receiver}|{amount}|{timestamp}|{note}"
//! id      = hex(SHA-256(payload || input_0 || input_1 || ...))
//! ```
//!
//! Two transactions with identical fields, timestamp and ordered inputs share
//! an id. The settlement scheduler relies on this to produce reproducible
//! levy transaction ids. Reordering inputs changes the id.
//!
//! ## Validation
//!
//! Construction never fails. Amount and input validity are checked by the
//! consumer (UTXO set, transfer service), not here.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod transaction;

pub use error::{Result, TransactionError};
pub use transaction::Transaction;
