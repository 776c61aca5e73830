//! # Levy-Chain - Transfers (Subsystem 4)
//!
//! The submission path that turns a signed transfer request into UTXO
//! movements and a pending ledger entry.
//!
//! ## Flow
//!
//! ```text
//! SignedTransfer
//!   │ decode key + signature
//!   │ wallet_id(key) == sender ?
//!   │ verify signature over payload
//!   │ amount > 0, inputs non-empty
//!   │ every input: exists, owned by sender, unspent; sum >= amount
//!   ▼
//! UtxoSet::spend_all          (atomic, all or nothing)
//! receiver output  (index 0)
//! change output    (index 1, only if change > 0)
//!   ▼
//! Ledger::add_pending_transaction
//!   ▼
//! archive transaction + audit  (best-effort, errors logged)
//! ```
//!
//! Validation failures leave the UTXO set and the ledger untouched. The UTXO
//! set and the ledger are never locked together: a crash between spending and
//! enqueueing is not masked here.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod service;

pub use error::{Result, TransferError};
pub use service::{SignedTransfer, TransferReceipt, TransferService};
