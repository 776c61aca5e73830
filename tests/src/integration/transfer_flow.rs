//! # Transfer Flow
//!
//! Signed transfer → UTXO spend/outputs → pending id → mined block → archive.

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, MINER};
    use lc_01_transaction::Transaction;
    use lc_02_utxo_set::UtxoSet;
    use lc_03_ledger::{mining_reward_marker, AuditRecord};
    use lc_04_transfers::SignedTransfer;
    use rand::Rng;

    #[tokio::test]
    async fn test_client_signed_transfer_is_mined() {
        let node = fixtures::node().await;
        let alice = fixtures::keypair(1);
        let bob = fixtures::keypair(2);

        let funding = node
            .transfers()
            .fund_wallet(&alice.wallet_id(), 500)
            .unwrap();

        let mut tx = Transaction::new(
            alice.wallet_id(),
            bob.wallet_id(),
            120,
            "rent",
            vec![funding.clone()],
        );
        tx.sign(&alice);
        let request = SignedTransfer::from_transaction(&tx).unwrap();

        let receipt = node.transfers().submit(request).await.unwrap();
        assert_eq!(receipt.tx_id, tx.id());
        assert_eq!(receipt.input_total, 500);
        assert_eq!(receipt.change, 380);
        assert_eq!(
            receipt.receiver_output,
            UtxoSet::transaction_output_id(tx.id(), 0)
        );

        let utxos = node.utxos();
        assert!(utxos.get(&funding).unwrap().spent);
        assert_eq!(utxos.balance_of(&alice.wallet_id()), 380);
        assert_eq!(utxos.balance_of(&bob.wallet_id()), 120);
        assert_eq!(node.ledger().pending_transactions(), vec![tx.id().to_string()]);

        let block = node.mine_pending().await.unwrap();
        assert_eq!(block.index, 1);
        assert_eq!(
            block.transaction_ids,
            vec![tx.id().to_string(), mining_reward_marker(MINER)]
        );
        assert_eq!(node.ledger().pending_count(), 0);
        assert!(node.ledger().validate_chain());

        let archive = node.archive();
        assert_eq!(archive.transactions().len(), 1);
        assert!(matches!(
            archive.audit_log().as_slice(),
            [AuditRecord::TransferAccepted { amount: 120, .. }]
        ));
    }

    #[tokio::test]
    async fn test_rejected_transfer_leaves_no_trace() {
        let node = fixtures::node().await;
        let alice = fixtures::keypair(1);
        let mallory = fixtures::keypair(9);

        let funding = node
            .transfers()
            .fund_wallet(&alice.wallet_id(), 100)
            .unwrap();

        // Mallory signs a spend of Alice's output with her own key
        let mut tx = Transaction::new(alice.wallet_id(), mallory.wallet_id(), 100, "", vec![
            funding.clone(),
        ]);
        tx.sign(&mallory);
        let request = SignedTransfer::from_transaction(&tx).unwrap();

        let err = node.transfers().submit(request).await.unwrap_err();
        assert!(err.is_authorization_failure());
        assert!(!node.utxos().get(&funding).unwrap().spent);
        assert_eq!(node.ledger().pending_count(), 0);
        assert!(node.archive().audit_log().is_empty());
    }

    #[tokio::test]
    async fn test_random_transfer_chain_conserves_supply() {
        let node = fixtures::node().await;
        let wallets: Vec<_> = (1..=4).map(fixtures::keypair).collect();
        for w in &wallets {
            node.transfers().fund_wallet(&w.wallet_id(), 1_000).unwrap();
        }
        let supply = fixtures::total_supply(&node);

        let mut rng = rand::thread_rng();
        let mut accepted = 0;
        for _ in 0..40 {
            let from = &wallets[rng.gen_range(0..wallets.len())];
            let to = &wallets[rng.gen_range(0..wallets.len())];
            let amount = rng.gen_range(1..=300);
            if node
                .transfers()
                .sign_and_submit(from, &to.wallet_id(), amount, "shuffle")
                .await
                .is_ok()
            {
                accepted += 1;
            }
        }

        assert_eq!(fixtures::total_supply(&node), supply);
        assert_eq!(node.ledger().pending_count(), accepted);

        let block = node.mine_pending().await.unwrap();
        assert_eq!(block.transaction_ids.len(), accepted + 1);
        assert!(node.ledger().validate_chain());
    }
}
