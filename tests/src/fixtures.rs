//! Shared builders for the suite

use node_runtime::{LedgerNode, NodeConfig};
use shared_crypto::Ed25519KeyPair;

/// Pool wallet used by every fixture node
pub const POOL: &str = "test-pool";

/// Miner credited by `LedgerNode::mine_pending`
pub const MINER: &str = "test-miner";

/// Node config with cheap proof-of-work
pub fn fast_config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.ledger.difficulty = 1;
    config.ledger.mining_threads = 2;
    config.settlement.pool_wallet = POOL.to_string();
    config.miner_address = MINER.to_string();
    config
}

/// Fully wired node with genesis mined
pub async fn node() -> LedgerNode {
    LedgerNode::new(fast_config())
        .await
        .expect("fixture node must build")
}

/// Deterministic keypair per label
pub fn keypair(label: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed([label; 32])
}

/// Sum of every wallet balance in the UTXO set
pub fn total_supply(node: &LedgerNode) -> i64 {
    node.utxos().balances().iter().map(|(_, b)| b).sum()
}
