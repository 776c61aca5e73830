//! # Levy-Chain - UTXO Set (Subsystem 2)
//!
//! The sole source of truth for "is this money spendable, and by whom".
//!
//! ## Model
//!
//! A [`Utxo`] is `{id, owner, amount, spent}`. Once created, `owner` and
//! `amount` never change; `spent` flips from `false` to `true` exactly once.
//! Spent outputs stay in the set for audit.
//!
//! ## Concurrency
//!
//! Every mutation runs under one exclusive section scoped to the whole set.
//! [`UtxoSet::spend`] and [`UtxoSet::spend_all`] perform the
//! exists / owner / unspent check and the state transition inside that same
//! section, so concurrent spenders of one output are linearized: exactly one
//! succeeds and the rest observe [`UtxoError::AlreadySpent`].
//!
//! Reads (`balance_of`, `unspent_outputs_of`, `balances`) take the shared
//! side of the lock and therefore see a consistent snapshot.
//!
//! ## Identifiers
//!
//! | Origin | Id |
//! |--------|----|
//! | Funding (`add_output`) | `sha256(owner ":" amount ":" set_size)` |
//! | Transaction output (`add_transaction_output`) | `sha256(tx_id ":" index)` |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod utxo_set;

pub use error::{Result, UtxoError};
pub use utxo_set::{Utxo, UtxoSet};
