//! # Node Runtime Library
//!
//! Builds a Levy-Chain node from configuration. The main entry point is the
//! `main.rs` binary; this library exposes the pieces for tests.
//!
//! - [`container`]: `NodeConfig` and the `LedgerNode` dependency container
//! - [`telemetry`]: tracing-subscriber setup

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod container;
pub mod telemetry;

pub use container::{ConfigError, LedgerNode, NodeConfig, NodeError};
