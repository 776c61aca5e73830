//! # Node Container
//!
//! Central container holding every subsystem instance. Each component is
//! constructed exactly once and handed to its consumers as an `Arc`; nothing
//! is reachable through global state.

pub mod config;
pub mod node;

pub use config::{ConfigError, NodeConfig};
pub use node::{LedgerNode, NodeError};
