//! Settlement scheduler

use crate::config::{compute_levy, SettlementConfig};
use crate::error::{Result, SettlementError};
use crate::ports::{WalletBalance, WalletDirectory};
use crate::report::{LevyEntry, SettlementReport};
use chrono::{DateTime, Utc};
use lc_01_transaction::Transaction;
use lc_02_utxo_set::UtxoSet;
use lc_03_ledger::{AuditRecord, Block, Ledger, LedgerArchive, TransactionRecord};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Handle to the spawned background loop
struct RunningTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

struct Inner {
    config: SettlementConfig,
    ledger: Arc<Ledger>,
    utxos: Arc<UtxoSet>,
    directory: Arc<dyn WalletDirectory>,
    archive: Arc<dyn LedgerArchive>,
    last_run: RwLock<DateTime<Utc>>,
    /// Serializes passes: background tick vs. manual trigger
    pass_lock: tokio::sync::Mutex<()>,
}

/// Periodic settlement levy.
///
/// Holds no state beyond the last-run timestamp and handles to the ledger,
/// UTXO set, wallet directory and archive.
pub struct SettlementScheduler {
    inner: Arc<Inner>,
    task: Mutex<Option<RunningTask>>,
}

impl SettlementScheduler {
    /// Create a scheduler. The last-run timestamp starts at "now".
    pub fn new(
        config: SettlementConfig,
        ledger: Arc<Ledger>,
        utxos: Arc<UtxoSet>,
        directory: Arc<dyn WalletDirectory>,
        archive: Arc<dyn LedgerArchive>,
    ) -> Result<Self> {
        config.validate().map_err(SettlementError::InvalidConfig)?;

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                ledger,
                utxos,
                directory,
                archive,
                last_run: RwLock::new(Utc::now()),
                pass_lock: tokio::sync::Mutex::new(()),
            }),
            task: Mutex::new(None),
        })
    }

    /// Start the background loop. No-op if it is already running.
    ///
    /// The loop wakes every `check_interval` and runs a pass once `interval`
    /// has elapsed since the last run.
    pub fn start(&self) -> Result<()> {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            debug!("[lc-05] Scheduler already running");
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SettlementError::NoRuntime)?;
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = runtime.spawn(Arc::clone(&self.inner).run(shutdown_rx));

        *task = Some(RunningTask { shutdown, handle });
        info!(
            "[lc-05] Settlement scheduler started (rate={}bps, pool={})",
            self.inner.config.levy_rate_bps, self.inner.config.pool_wallet
        );
        Ok(())
    }

    /// Signal the loop to exit and wait for it. No-op if not running.
    ///
    /// A pass already in progress finishes first.
    pub async fn stop(&self) {
        let Some(RunningTask { shutdown, handle }) = self.task.lock().take() else {
            return;
        };

        // Err only if the loop already exited and dropped its receiver
        let _ = shutdown.send(true);
        if let Err(e) = handle.await {
            error!("[lc-05] Scheduler task ended abnormally: {}", e);
        }
        info!("[lc-05] Settlement scheduler stopped");
    }

    /// Whether the background loop is alive
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// Run one pass immediately, regardless of elapsed time.
    ///
    /// The last-run timestamp is updated whether or not the pass succeeds.
    pub async fn trigger_now(&self) -> Result<SettlementReport> {
        info!("[lc-05] Manual settlement triggered");
        self.inner.run_and_stamp().await
    }

    /// When the last pass ran (or when the scheduler was created)
    pub fn last_run(&self) -> DateTime<Utc> {
        *self.inner.last_run.read()
    }

    /// Load the last-run timestamp from the wallet directory, if it has one
    pub async fn restore_last_run(&self) -> Result<Option<DateTime<Utc>>> {
        let stored = self.inner.directory.last_settlement().await?;
        if let Some(at) = stored {
            *self.inner.last_run.write() = at;
            info!("[lc-05] Restored last settlement time: {}", at);
        }
        Ok(stored)
    }

    /// Unspent value held by the pool wallet
    pub fn pool_balance(&self) -> i64 {
        self.inner.utxos.balance_of(&self.inner.config.pool_wallet)
    }

    /// Scheduler configuration
    pub fn config(&self) -> &SettlementConfig {
        &self.inner.config
    }
}

impl Inner {
    async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let period = self.config.check_interval();
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    info!("[lc-05] Shutdown signal received");
                    break;
                }
                _ = ticker.tick() => {
                    if let Some(Err(e)) = self.run_if_due().await {
                        error!("[lc-05] Settlement pass failed: {}", e);
                    }
                }
            }
        }
    }

    fn is_due(&self) -> bool {
        let elapsed = Utc::now() - *self.last_run.read();
        elapsed
            .to_std()
            .map(|e| e >= self.config.interval())
            .unwrap_or(false)
    }

    async fn run_and_stamp(&self) -> Result<SettlementReport> {
        let _guard = self.pass_lock.lock().await;
        self.stamped_pass().await
    }

    /// Background path: `None` when no pass is due.
    ///
    /// Due-ness is decided under the pass lock, so a tick queued behind a
    /// manual pass sees that pass's timestamp.
    async fn run_if_due(&self) -> Option<Result<SettlementReport>> {
        let _guard = self.pass_lock.lock().await;
        if !self.is_due() {
            return None;
        }
        Some(self.stamped_pass().await)
    }

    async fn stamped_pass(&self) -> Result<SettlementReport> {
        let result = self.process_settlement().await;
        *self.last_run.write() = Utc::now();
        result
    }

    #[tracing::instrument(skip(self), fields(pool = %self.config.pool_wallet))]
    async fn process_settlement(&self) -> Result<SettlementReport> {
        let ran_at = Utc::now();
        info!("[lc-05] Processing settlement levies");

        let wallets = self.directory.all_wallet_balances().await.map_err(|e| {
            error!("[lc-05] Cannot enumerate wallets, aborting pass: {}", e);
            SettlementError::from(e)
        })?;

        let mut levies = Vec::new();
        let mut skipped = 0usize;

        for wallet in &wallets {
            if wallet.wallet_id == self.config.pool_wallet {
                continue;
            }
            match self.levy_wallet(wallet, ran_at.timestamp()) {
                Some((entry, tx)) => {
                    info!(
                        "[lc-05] Levied {} from {} (balance {})",
                        entry.amount, entry.wallet_id, entry.balance
                    );
                    self.archive_transaction(&tx).await;
                    levies.push(entry);
                }
                None => skipped += 1,
            }
        }

        let total_levied = levies.iter().fold(0i64, |acc, l| acc.saturating_add(l.amount));

        if levies.is_empty() {
            info!("[lc-05] No wallets eligible for settlement");
            return Ok(SettlementReport {
                ran_at,
                levies,
                total_levied,
                block: None,
                skipped,
            });
        }

        self.ledger
            .add_pending_transactions(levies.iter().map(|l| l.tx_id.clone()));
        for entry in &levies {
            self.audit(AuditRecord::LevyDeducted {
                wallet_id: entry.wallet_id.clone(),
                amount: entry.amount,
                balance: entry.balance,
                tx_id: entry.tx_id.clone(),
                at: ran_at,
            })
            .await;
        }
        info!(
            "[lc-05] Total levied: {} from {} wallets",
            total_levied,
            levies.len()
        );

        let block = self.mine_batch().await?;
        info!("[lc-05] Settlement block mined: #{} {}", block.index, block.hash);

        if let Err(e) = self.archive.persist_block(&block).await {
            warn!("[lc-05] Failed to archive settlement block: {}", e);
        }
        self.audit(AuditRecord::SettlementBlockMined {
            block_index: block.index,
            block_hash: block.hash.clone(),
            levy_count: levies.len(),
            total_levied,
            at: ran_at,
        })
        .await;
        if let Err(e) = self.directory.record_settlement(ran_at).await {
            warn!("[lc-05] Failed to record settlement time: {}", e);
        }

        Ok(SettlementReport {
            ran_at,
            levies,
            total_levied,
            block: Some(block),
            skipped,
        })
    }

    /// Compute and, when reconciling, apply one wallet's levy.
    ///
    /// `None` means the wallet is passed over for this pass.
    fn levy_wallet(
        &self,
        wallet: &WalletBalance,
        timestamp: i64,
    ) -> Option<(LevyEntry, Transaction)> {
        if wallet.wallet_id.is_empty() || wallet.balance < 0 {
            warn!(
                "[lc-05] Skipping malformed wallet row {:?} ({})",
                wallet.wallet_id, wallet.balance
            );
            return None;
        }

        let amount = compute_levy(wallet.balance, self.config.levy_rate_bps);
        if amount == 0 {
            return None;
        }

        let tx = if self.config.reconcile_utxos {
            self.reconcile(wallet, amount, timestamp)?
        } else {
            Transaction::with_timestamp(
                wallet.wallet_id.as_str(),
                self.config.pool_wallet.as_str(),
                amount,
                timestamp,
                self.config.note.as_str(),
                Vec::new(),
            )
        };

        let entry = LevyEntry {
            wallet_id: wallet.wallet_id.clone(),
            balance: wallet.balance,
            amount,
            tx_id: tx.id().to_string(),
        };
        Some((entry, tx))
    }

    /// Spend the wallet's outputs into a pool output plus change.
    fn reconcile(&self, wallet: &WalletBalance, amount: i64, timestamp: i64) -> Option<Transaction> {
        let owner = wallet.wallet_id.as_str();
        let pool = self.config.pool_wallet.as_str();

        let (inputs, _) = self
            .utxos
            .select_inputs(owner, amount)
            .inspect_err(|e| warn!("[lc-05] Cannot fund levy for {}: {}", owner, e))
            .ok()?;

        let tx = Transaction::with_timestamp(
            owner,
            pool,
            amount,
            timestamp,
            self.config.note.as_str(),
            inputs,
        );

        let spent = self
            .utxos
            .spend_all(tx.input_utxo_ids(), owner)
            .inspect_err(|e| warn!("[lc-05] Levy inputs for {} changed under us: {}", owner, e))
            .ok()?;

        if let Err(e) = self.utxos.add_transaction_output(tx.id(), 0, pool, amount) {
            error!("[lc-05] Failed to credit pool for {}: {}", tx.id(), e);
        }
        let change = spent - amount;
        if change > 0 {
            if let Err(e) = self.utxos.add_transaction_output(tx.id(), 1, owner, change) {
                error!("[lc-05] Failed to return change for {}: {}", tx.id(), e);
            }
        }
        Some(tx)
    }

    async fn mine_batch(&self) -> Result<Block> {
        let ledger = Arc::clone(&self.ledger);
        let pool = self.config.pool_wallet.clone();

        tokio::task::spawn_blocking(move || ledger.mine_pending_transactions(&pool))
            .await
            .map_err(|e| SettlementError::MiningTask(e.to_string()))?
            .map_err(|e| {
                error!("[lc-05] Settlement mining failed: {}", e);
                SettlementError::from(e)
            })
    }

    async fn archive_transaction(&self, tx: &Transaction) {
        if let Err(e) = self
            .archive
            .persist_transaction(&TransactionRecord::from(tx))
            .await
        {
            warn!("[lc-05] Failed to archive levy {}: {}", tx.id(), e);
        }
    }

    async fn audit(&self, record: AuditRecord) {
        let event = record.event_name();
        if let Err(e) = self.archive.append_audit(record).await {
            warn!("[lc-05] Failed to write {} audit record: {}", event, e);
        }
    }
}

impl Drop for SettlementScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            let _ = task.shutdown.send(true);
        }
    }
}
