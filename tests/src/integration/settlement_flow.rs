//! # Settlement Flow
//!
//! Transfers, then settlement passes over the real UTXO-backed directory.

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, POOL};
    use lc_03_ledger::AuditRecord;

    #[tokio::test]
    async fn test_transfer_then_settlement() {
        let node = fixtures::node().await;
        let alice = fixtures::keypair(1);
        let bob = fixtures::keypair(2);
        let (a, b) = (alice.wallet_id(), bob.wallet_id());

        node.transfers().fund_wallet(&a, 10_000).unwrap();
        let transfer = node
            .transfers()
            .sign_and_submit(&alice, &b, 4_000, "invoice 7")
            .await
            .unwrap();
        node.mine_pending().await.unwrap();

        let settlement = node.settlement();
        let report = settlement.trigger_now().await.unwrap();
        assert!(report.mined());
        assert_eq!(report.levies.len(), 2);
        assert_eq!(report.total_levied, 150 + 100);

        let block = report.block.as_ref().unwrap();
        assert_eq!(block.index, 2);
        for levy in &report.levies {
            assert!(block.transaction_ids.contains(&levy.tx_id));
        }

        let utxos = node.utxos();
        assert_eq!(utxos.balance_of(&a), 5_850);
        assert_eq!(utxos.balance_of(&b), 3_900);
        assert_eq!(utxos.balance_of(POOL), 250);
        assert_eq!(settlement.pool_balance(), 250);
        assert_eq!(fixtures::total_supply(&node), 10_000);

        let log = node.archive().audit_log();
        assert!(matches!(
            &log[0],
            AuditRecord::TransferAccepted { tx_id, .. } if *tx_id == transfer.tx_id
        ));
        assert!(matches!(log[1], AuditRecord::LevyDeducted { .. }));
        assert!(matches!(log[2], AuditRecord::LevyDeducted { .. }));
        assert!(matches!(
            log[3],
            AuditRecord::SettlementBlockMined { block_index: 2, levy_count: 2, total_levied: 250, .. }
        ));

        assert!(node.ledger().validate_chain());
    }

    #[tokio::test]
    async fn test_repeated_passes_never_levy_pool() {
        let node = fixtures::node().await;
        let alice = fixtures::keypair(1);
        node.transfers().fund_wallet(&alice.wallet_id(), 10_000).unwrap();

        let settlement = node.settlement();
        let first = settlement.trigger_now().await.unwrap();
        let second = settlement.trigger_now().await.unwrap();

        assert_eq!(first.total_levied, 250);
        // 9_750 * 2.5% = 243.75
        assert_eq!(second.total_levied, 243);
        assert!(second.levies.iter().all(|l| l.wallet_id != POOL));
        assert_eq!(settlement.pool_balance(), 493);
        assert_eq!(node.ledger().chain_length(), 3);
        assert!(node.ledger().validate_chain());
    }

    #[tokio::test]
    async fn test_dust_wallets_mine_nothing() {
        let node = fixtures::node().await;
        for label in 1..=3 {
            node.transfers()
                .fund_wallet(&fixtures::keypair(label).wallet_id(), 39)
                .unwrap();
        }

        let report = node.settlement().trigger_now().await.unwrap();
        assert!(!report.mined());
        assert_eq!(report.skipped, 3);
        assert_eq!(node.ledger().chain_length(), 1);
        assert!(node.archive().audit_log().is_empty());
    }

    #[tokio::test]
    async fn test_scheduler_lifecycle_on_node() {
        let node = fixtures::node().await;
        let settlement = node.settlement();

        settlement.start().unwrap();
        assert!(settlement.is_running());
        settlement.stop().await;
        assert!(!settlement.is_running());
    }
}
