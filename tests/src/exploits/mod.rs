//! Attack simulations against ledger and UTXO invariants

pub mod double_spend;
pub mod tampering;
