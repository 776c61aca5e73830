//! # Chain Tampering
//!
//! Rewriting mined history must be caught by chain validation.

#[cfg(test)]
mod tests {
    use crate::fixtures;
    use lc_03_ledger::{ChainValidation, ViolationKind};
    use node_runtime::LedgerNode;

    async fn node_with_history() -> LedgerNode {
        let node = fixtures::node().await;
        let alice = fixtures::keypair(1);
        node.transfers().fund_wallet(&alice.wallet_id(), 1_000).unwrap();
        for amount in [10, 20, 30] {
            node.transfers()
                .sign_and_submit(&alice, "bob", amount, "")
                .await
                .unwrap();
            node.mine_pending().await.unwrap();
        }
        assert_eq!(node.ledger().chain_length(), 4);
        assert!(node.ledger().validate_chain());
        node
    }

    #[tokio::test]
    async fn test_rewritten_transaction_list_detected() {
        let node = node_with_history().await;
        let ledger = node.ledger();

        ledger
            .tamper_with(2, |block| block.transaction_ids[0] = "forged".into())
            .unwrap();

        assert_eq!(
            ledger.validate_chain_report(),
            ChainValidation::Invalid {
                index: 2,
                kind: ViolationKind::HashMismatch
            }
        );
    }

    #[tokio::test]
    async fn test_resealed_block_breaks_next_link() {
        let node = node_with_history().await;
        let ledger = node.ledger();

        // Attacker recomputes block 1's hash but cannot redo the work for
        // every later block.
        ledger
            .tamper_with(1, |block| {
                block.transaction_ids.push("extra".into());
                block.hash = block.compute_hash();
            })
            .unwrap();

        let report = ledger.validate_chain_report();
        assert!(!report.is_valid());
        assert!(matches!(
            report,
            ChainValidation::Invalid { index: 1, kind: ViolationKind::InsufficientWork }
                | ChainValidation::Invalid { index: 2, kind: ViolationKind::BrokenLink }
        ));
    }

    #[tokio::test]
    async fn test_genesis_is_not_revalidated() {
        let node = node_with_history().await;
        let ledger = node.ledger();

        ledger
            .tamper_with(0, |block| block.nonce += 1)
            .unwrap();

        // Block 1 still links to the stored genesis hash
        assert!(ledger.validate_chain());
    }
}
