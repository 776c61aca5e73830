//! Outbound ports (driven side - SPI)

use crate::domain::Block;
use crate::error::ArchiveError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lc_01_transaction::Transaction;
use serde::{Deserialize, Serialize};

/// Port: durable store for sealed blocks, transactions and audit entries.
///
/// Callers invoke this only after in-memory state is already consistent,
/// and treat every error as best-effort: log it, never roll back.
#[async_trait]
pub trait LedgerArchive: Send + Sync {
    /// Persist a sealed block
    async fn persist_block(&self, block: &Block) -> Result<(), ArchiveError>;

    /// Persist a transaction together with its authorization fields
    async fn persist_transaction(&self, record: &TransactionRecord) -> Result<(), ArchiveError>;

    /// Append an audit entry
    async fn append_audit(&self, record: AuditRecord) -> Result<(), ArchiveError>;
}

/// Archived form of a transaction, keys and signature hex-encoded
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction id
    pub id: String,
    /// Sender wallet id
    pub sender_id: String,
    /// Receiver wallet id
    pub receiver_id: String,
    /// Amount
    pub amount: i64,
    /// Unix timestamp (seconds)
    pub timestamp: i64,
    /// Note
    pub note: String,
    /// Spent inputs, in order
    pub input_utxo_ids: Vec<String>,
    /// Hex public key, absent for system transactions
    pub sender_public_key: Option<String>,
    /// Hex signature, absent for system transactions
    pub signature: Option<String>,
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id().to_string(),
            sender_id: tx.sender_id().to_string(),
            receiver_id: tx.receiver_id().to_string(),
            amount: tx.amount(),
            timestamp: tx.timestamp(),
            note: tx.note().to_string(),
            input_utxo_ids: tx.input_utxo_ids().to_vec(),
            sender_public_key: tx.sender_public_key().map(|pk| pk.to_hex()),
            signature: tx.signature().map(|sig| sig.to_hex()),
        }
    }
}

/// Typed audit entries, one variant per event shape
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditRecord {
    /// A user transfer passed verification and was enqueued
    TransferAccepted {
        /// Transaction id
        tx_id: String,
        /// Sender wallet id
        sender_id: String,
        /// Receiver wallet id
        receiver_id: String,
        /// Amount
        amount: i64,
        /// When it was accepted
        at: DateTime<Utc>,
    },

    /// A settlement levy was computed for a wallet
    LevyDeducted {
        /// Levied wallet
        wallet_id: String,
        /// Levy amount
        amount: i64,
        /// Balance the levy was computed from
        balance: i64,
        /// Levy transaction id
        tx_id: String,
        /// When the pass ran
        at: DateTime<Utc>,
    },

    /// A settlement batch was sealed into a block
    SettlementBlockMined {
        /// Block index
        block_index: u64,
        /// Block hash
        block_hash: String,
        /// Number of levy transactions
        levy_count: usize,
        /// Sum of levies
        total_levied: i64,
        /// When the pass ran
        at: DateTime<Utc>,
    },
}

impl AuditRecord {
    /// Event name as serialized
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::TransferAccepted { .. } => "transfer_accepted",
            Self::LevyDeducted { .. } => "levy_deducted",
            Self::SettlementBlockMined { .. } => "settlement_block_mined",
        }
    }
}
