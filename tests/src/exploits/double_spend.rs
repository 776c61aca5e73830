//! # Double-Spend Attempts
//!
//! The same output submitted twice, sequentially and concurrently, and a
//! levy racing a user transfer for the same output.

#[cfg(test)]
mod tests {
    use crate::fixtures;
    use lc_01_transaction::Transaction;
    use lc_04_transfers::SignedTransfer;
    use std::sync::Arc;

    fn signed(
        sender: &shared_crypto::Ed25519KeyPair,
        receiver: &str,
        amount: i64,
        inputs: Vec<String>,
    ) -> SignedTransfer {
        let mut tx = Transaction::new(sender.wallet_id(), receiver, amount, "", inputs);
        tx.sign(sender);
        SignedTransfer::from_transaction(&tx).unwrap()
    }

    #[tokio::test]
    async fn test_replayed_output_rejected() {
        let node = fixtures::node().await;
        let alice = fixtures::keypair(1);
        let funding = node
            .transfers()
            .fund_wallet(&alice.wallet_id(), 100)
            .unwrap();

        node.transfers()
            .submit(signed(&alice, "bob", 60, vec![funding.clone()]))
            .await
            .unwrap();
        let err = node
            .transfers()
            .submit(signed(&alice, "carol", 60, vec![funding]))
            .await
            .unwrap_err();

        assert!(err.is_double_spend());
        assert_eq!(node.utxos().balance_of("carol"), 0);
        assert_eq!(node.ledger().pending_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_input_in_one_transfer_rejected() {
        let node = fixtures::node().await;
        let alice = fixtures::keypair(1);
        let funding = node
            .transfers()
            .fund_wallet(&alice.wallet_id(), 100)
            .unwrap();

        let err = node
            .transfers()
            .submit(signed(&alice, "bob", 150, vec![funding.clone(), funding.clone()]))
            .await
            .unwrap_err();

        assert!(err.is_double_spend());
        assert!(!node.utxos().get(&funding).unwrap().spent);
        assert_eq!(node.ledger().pending_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_spends_exactly_one_wins() {
        let node = fixtures::node().await;
        let alice = fixtures::keypair(1);
        let funding = node
            .transfers()
            .fund_wallet(&alice.wallet_id(), 1_000)
            .unwrap();

        let transfers = node.transfers();
        let mut handles = Vec::new();
        for i in 0..16 {
            let service = Arc::clone(&transfers);
            let request = signed(&alice, &format!("thief-{i}"), 1_000, vec![funding.clone()]);
            handles.push(tokio::spawn(async move { service.submit(request).await }));
        }

        let mut wins = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(e) => assert!(e.is_double_spend(), "unexpected rejection: {e}"),
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(fixtures::total_supply(&node), 1_000);
        assert_eq!(node.ledger().pending_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_levy_and_transfer_race_conserves_value() {
        let node = fixtures::node().await;
        let alice = fixtures::keypair(1);
        let funding = node
            .transfers()
            .fund_wallet(&alice.wallet_id(), 10_000)
            .unwrap();

        let transfers = node.transfers();
        let settlement = node.settlement();
        let request = signed(&alice, "bob", 10_000, vec![funding]);

        let (transfer, pass) = tokio::join!(
            tokio::spawn(async move { transfers.submit(request).await }),
            tokio::spawn(async move { settlement.trigger_now().await }),
        );
        let transfer = transfer.unwrap();
        let pass = pass.unwrap().unwrap();

        // Whichever side lost the output saw it spent, never both.
        assert_eq!(fixtures::total_supply(&node), 10_000);
        if transfer.is_ok() {
            assert_eq!(node.utxos().balance_of("bob"), 10_000 - pass.total_levied);
        } else {
            assert!(transfer.unwrap_err().is_double_spend());
            assert_eq!(pass.total_levied, 250);
        }
        assert!(node.ledger().validate_chain());
    }
}
