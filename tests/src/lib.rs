//! # Levy-Chain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── exploits/         # Attack simulations
//! │   ├── double_spend.rs
//! │   └── tampering.rs
//! │
//! └── integration/      # Cross-subsystem flows
//!     ├── settlement_flow.rs
//!     └── transfer_flow.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lc-tests
//! cargo test -p lc-tests integration::
//! cargo test -p lc-tests exploits::
//! ```

pub mod exploits;
pub mod fixtures;
pub mod integration;
