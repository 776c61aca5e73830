//! Transfer submission service

use crate::error::{Result, TransferError};
use chrono::Utc;
use lc_01_transaction::Transaction;
use lc_02_utxo_set::{UtxoError, UtxoSet};
use lc_03_ledger::{AuditRecord, Ledger, LedgerArchive, TransactionRecord};
use serde::{Deserialize, Serialize};
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Wire-level transfer request, key and signature hex-encoded
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransfer {
    /// Sender wallet id
    pub sender_id: String,
    /// Receiver wallet id
    pub receiver_id: String,
    /// Amount to transfer
    pub amount: i64,
    /// Timestamp the sender signed with
    pub timestamp: i64,
    /// Free-form note
    pub note: String,
    /// Outputs being spent, in order
    pub input_utxo_ids: Vec<String>,
    /// Hex Ed25519 public key
    pub public_key: String,
    /// Hex Ed25519 signature over the payload
    pub signature: String,
}

impl SignedTransfer {
    /// Encode a signed transaction as a request; `None` if unsigned
    pub fn from_transaction(tx: &Transaction) -> Option<Self> {
        let (public_key, signature) = (tx.sender_public_key()?, tx.signature()?);
        Some(Self {
            sender_id: tx.sender_id().to_string(),
            receiver_id: tx.receiver_id().to_string(),
            amount: tx.amount(),
            timestamp: tx.timestamp(),
            note: tx.note().to_string(),
            input_utxo_ids: tx.input_utxo_ids().to_vec(),
            public_key: public_key.to_hex(),
            signature: signature.to_hex(),
        })
    }
}

/// What an accepted transfer did to the UTXO set
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    /// Transaction id now pending in the ledger
    pub tx_id: String,
    /// Sum of the consumed inputs
    pub input_total: i64,
    /// Output created for the receiver
    pub receiver_output: String,
    /// Change output for the sender, if any
    pub change_output: Option<String>,
    /// Change returned to the sender
    pub change: i64,
}

/// Submission path wired to a UTXO set, a ledger and an archive
pub struct TransferService {
    utxos: Arc<UtxoSet>,
    ledger: Arc<Ledger>,
    archive: Arc<dyn LedgerArchive>,
}

impl TransferService {
    /// Create the service
    pub fn new(utxos: Arc<UtxoSet>, ledger: Arc<Ledger>, archive: Arc<dyn LedgerArchive>) -> Self {
        Self {
            utxos,
            ledger,
            archive,
        }
    }

    /// Credit a wallet with a fresh output
    pub fn fund_wallet(&self, wallet_id: &str, amount: i64) -> Result<String> {
        let id = self.utxos.add_output(wallet_id, amount)?;
        info!("[lc-04] Funded {} with {}", wallet_id, amount);
        Ok(id)
    }

    /// Verify a signed transfer, move value and enqueue it with the ledger.
    #[tracing::instrument(skip(self, request), fields(sender = %request.sender_id, amount = request.amount))]
    pub async fn submit(&self, request: SignedTransfer) -> Result<TransferReceipt> {
        let public_key = Ed25519PublicKey::from_hex(&request.public_key)?;
        let signature = Ed25519Signature::from_hex(&request.signature)?;

        let mut tx = Transaction::with_timestamp(
            request.sender_id,
            request.receiver_id,
            request.amount,
            request.timestamp,
            request.note,
            request.input_utxo_ids,
        );
        tx.attach_signature(public_key, signature);
        tx.verify_sender_key()?;
        tx.verify_signature()?;

        self.accept(tx).await
    }

    /// Select inputs for `keypair`'s wallet, sign, and submit.
    pub async fn sign_and_submit(
        &self,
        keypair: &Ed25519KeyPair,
        receiver_id: &str,
        amount: i64,
        note: &str,
    ) -> Result<TransferReceipt> {
        if amount <= 0 {
            return Err(TransferError::InvalidAmount { amount });
        }

        let sender_id = keypair.wallet_id();
        let (inputs, _) = self.utxos.select_inputs(&sender_id, amount)?;
        let mut tx = Transaction::new(sender_id, receiver_id, amount, note, inputs);
        tx.sign(keypair);

        debug!("[lc-04] Signed {} server-side", tx.id());
        self.accept(tx).await
    }

    /// Checks and state transitions after authorization passed.
    async fn accept(&self, tx: Transaction) -> Result<TransferReceipt> {
        let amount = tx.amount();
        if amount <= 0 {
            return Err(TransferError::InvalidAmount { amount });
        }
        if tx.input_utxo_ids().is_empty() {
            return Err(TransferError::NoInputs);
        }

        let provided = self.check_inputs(&tx)?;
        if provided < amount {
            return Err(TransferError::InsufficientInputs {
                required: amount,
                provided,
            });
        }

        // Re-checks atomically: a concurrent spender between the check above
        // and here makes this fail with nothing mutated.
        let input_total = self
            .utxos
            .spend_all(tx.input_utxo_ids(), tx.sender_id())
            .inspect_err(|err| {
                if err.is_double_spend() {
                    warn!("[lc-04] Double-spend rejected for {}: {}", tx.id(), err);
                }
            })?;

        let receiver_output =
            self.utxos
                .add_transaction_output(tx.id(), 0, tx.receiver_id(), amount)?;

        let change = input_total - amount;
        let change_output = if change > 0 {
            Some(
                self.utxos
                    .add_transaction_output(tx.id(), 1, tx.sender_id(), change)?,
            )
        } else {
            None
        };

        self.ledger.add_pending_transaction(tx.id());
        info!(
            "[lc-04] Accepted {}: {} -> {} amount={} change={}",
            tx.id(),
            tx.sender_id(),
            tx.receiver_id(),
            amount,
            change
        );

        self.archive_best_effort(&tx).await;

        Ok(TransferReceipt {
            tx_id: tx.id().to_string(),
            input_total,
            receiver_output,
            change_output,
            change,
        })
    }

    /// Read-only pass over the declared inputs; returns their sum.
    fn check_inputs(&self, tx: &Transaction) -> Result<i64> {
        let mut total: i64 = 0;
        for id in tx.input_utxo_ids() {
            let utxo = self
                .utxos
                .get(id)
                .ok_or_else(|| UtxoError::NotFound { id: id.clone() })?;
            if utxo.owner != tx.sender_id() {
                return Err(UtxoError::OwnerMismatch {
                    id: id.clone(),
                    owner: utxo.owner,
                    claimed: tx.sender_id().to_string(),
                }
                .into());
            }
            if utxo.spent {
                return Err(UtxoError::AlreadySpent { id: id.clone() }.into());
            }
            total = total.checked_add(utxo.amount).ok_or(UtxoError::Overflow)?;
        }
        Ok(total)
    }

    async fn archive_best_effort(&self, tx: &Transaction) {
        if let Err(err) = self
            .archive
            .persist_transaction(&TransactionRecord::from(tx))
            .await
        {
            warn!("[lc-04] Failed to archive transaction {}: {}", tx.id(), err);
        }

        let record = AuditRecord::TransferAccepted {
            tx_id: tx.id().to_string(),
            sender_id: tx.sender_id().to_string(),
            receiver_id: tx.receiver_id().to_string(),
            amount: tx.amount(),
            at: Utc::now(),
        };
        if let Err(err) = self.archive.append_audit(record).await {
            warn!("[lc-04] Failed to audit transaction {}: {}", tx.id(), err);
        }
    }
}
