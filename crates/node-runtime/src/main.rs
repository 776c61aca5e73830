//! # Levy-Chain Node Runtime
//!
//! Entry point for a single Levy-Chain node.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, `LC_CONFIG` file, `LC_*` overrides)
//! 2. Install tracing (`RUST_LOG`, else the configured `log_level`)
//! 3. Build subsystems and mine genesis
//! 4. Restore the last settlement time from the wallet directory
//! 5. Start the settlement scheduler
//! 6. Run until Ctrl+C, then stop the scheduler and check the chain
//!
//! ```text
//!   TransferService ──pending ids──→ Ledger ←──levy ids + mine── SettlementScheduler
//!         │                            │                               │
//!         └──────── UtxoSet ←──────────┼────── reconcile levies ───────┘
//!                                      ↓
//!                               InMemoryArchive
//! ```

use anyhow::{Context, Result};
use node_runtime::{telemetry, LedgerNode, NodeConfig};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let (config, rejected) = NodeConfig::from_env().context("Failed to load configuration")?;
    telemetry::init_tracing(&config.log_level)?;

    info!("===========================================");
    info!("  Levy-Chain Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    for entry in &rejected {
        warn!("Ignoring unparsable {}", entry);
    }
    config.validate().context("Invalid configuration")?;

    let node = LedgerNode::new(config)
        .await
        .context("Failed to initialize node")?;
    info!("Genesis mined: {}", node.ledger().latest_block().hash);

    let settlement = node.settlement();
    if let Err(e) = settlement.restore_last_run().await {
        warn!("Could not restore last settlement time: {}", e);
    }
    settlement
        .start()
        .context("Failed to start settlement scheduler")?;
    info!(
        "Settlement scheduler running (pool={}, rate={}bps)",
        settlement.config().pool_wallet,
        settlement.config().levy_rate_bps
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    settlement.stop().await;

    let ledger = node.ledger();
    if ledger.validate_chain() {
        info!("Chain valid at shutdown ({} blocks)", ledger.chain_length());
    } else {
        error!("Chain invalid at shutdown: {:?}", ledger.validate_chain_report());
    }

    info!("Node stopped");
    Ok(())
}
