//! Cross-subsystem flows through a fully wired node

pub mod settlement_flow;
pub mod transfer_flow;
