//! In-memory archive

use crate::domain::Block;
use crate::error::ArchiveError;
use crate::ports::{AuditRecord, LedgerArchive, TransactionRecord};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Archive kept in process memory.
///
/// Can be switched into a failing mode to exercise best-effort paths.
#[derive(Default)]
pub struct InMemoryArchive {
    blocks: RwLock<Vec<Block>>,
    transactions: RwLock<Vec<TransactionRecord>>,
    audit: RwLock<Vec<AuditRecord>>,
    failing: AtomicBool,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    blocks: &'a [Block],
    transactions: &'a [TransactionRecord],
    audit: &'a [AuditRecord],
}

impl InMemoryArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Archived blocks, in write order
    pub fn blocks(&self) -> Vec<Block> {
        self.blocks.read().clone()
    }

    /// Archived transactions, in write order
    pub fn transactions(&self) -> Vec<TransactionRecord> {
        self.transactions.read().clone()
    }

    /// Audit log, in write order
    pub fn audit_log(&self) -> Vec<AuditRecord> {
        self.audit.read().clone()
    }

    /// Dump everything as one JSON document
    pub fn export_json(&self) -> Result<String, ArchiveError> {
        let blocks = self.blocks.read();
        let transactions = self.transactions.read();
        let audit = self.audit.read();
        let snapshot = Snapshot {
            blocks: &blocks,
            transactions: &transactions,
            audit: &audit,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    fn check_writable(&self) -> Result<(), ArchiveError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(ArchiveError::WriteFailed("archive unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerArchive for InMemoryArchive {
    async fn persist_block(&self, block: &Block) -> Result<(), ArchiveError> {
        self.check_writable()?;
        self.blocks.write().push(block.clone());
        Ok(())
    }

    async fn persist_transaction(&self, record: &TransactionRecord) -> Result<(), ArchiveError> {
        self.check_writable()?;
        self.transactions.write().push(record.clone());
        Ok(())
    }

    async fn append_audit(&self, record: AuditRecord) -> Result<(), ArchiveError> {
        self.check_writable()?;
        self.audit.write().push(record);
        Ok(())
    }
}
