//! Ledger service: chain state, pending pool and mining

use crate::config::LedgerConfig;
use crate::domain::{
    mining_reward_marker, Block, ChainValidation, DifficultyAdjuster, PoWMiner, ViolationKind,
};
use crate::error::{LedgerError, Result};
use crate::metrics::LedgerMetrics;
use parking_lot::RwLock;
use std::time::Instant;
use tracing::{debug, info, warn};

struct ChainState {
    blocks: Vec<Block>,
    pending: Vec<String>,
    difficulty: u32,
}

impl ChainState {
    fn tip(&self) -> &Block {
        // Construction always appends genesis and blocks are never removed
        &self.blocks[self.blocks.len() - 1]
    }
}

/// Append-only proof-of-work chain with a FIFO pending pool.
///
/// Blocks, the pending queue and the current difficulty sit behind one
/// `RwLock`. Mining holds the write side for the whole
/// snapshot -> search -> append -> clear cycle, so a concurrent
/// [`Ledger::add_pending_transaction`] lands either wholly before or wholly
/// after a given block. Readers block for the duration of the search.
pub struct Ledger {
    state: RwLock<ChainState>,
    miner: PoWMiner,
    adjuster: DifficultyAdjuster,
    config: LedgerConfig,
    metrics: LedgerMetrics,
}

impl Ledger {
    /// Build a ledger and mine its genesis block.
    ///
    /// Blocks the calling thread for the genesis proof-of-work search.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate().map_err(LedgerError::InvalidConfig)?;

        let miner = PoWMiner::new(config.mining_threads);
        let metrics = LedgerMetrics::new();
        let candidate = Block::genesis_candidate(now(), config.difficulty);
        let genesis = seal(&miner, candidate, &metrics)?;

        info!(
            "[lc-03] Genesis mined: hash={} nonce={} difficulty={}",
            genesis.hash, genesis.nonce, genesis.difficulty
        );

        Ok(Self {
            state: RwLock::new(ChainState {
                blocks: vec![genesis],
                pending: Vec::new(),
                difficulty: config.difficulty,
            }),
            miner,
            adjuster: DifficultyAdjuster::new(config.adjustment_window),
            config,
            metrics,
        })
    }

    /// Build a ledger at `difficulty` with default settings otherwise
    pub fn with_difficulty(difficulty: u32) -> Result<Self> {
        Self::new(LedgerConfig::with_difficulty(difficulty))
    }

    /// Append a transaction id to the pending queue.
    ///
    /// No existence or format checks happen here; the submission path owns
    /// validation.
    pub fn add_pending_transaction(&self, tx_id: impl Into<String>) {
        let tx_id = tx_id.into();
        debug!("[lc-03] Pending += {}", tx_id);
        self.state.write().pending.push(tx_id);
    }

    /// Append a batch of ids under one lock.
    ///
    /// A concurrent mining cycle takes either the whole batch or none of it.
    pub fn add_pending_transactions<I>(&self, tx_ids: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut state = self.state.write();
        let before = state.pending.len();
        state.pending.extend(tx_ids.into_iter().map(Into::into));
        debug!("[lc-03] Pending += {} ids", state.pending.len() - before);
    }

    /// Snapshot of the pending queue
    pub fn pending_transactions(&self) -> Vec<String> {
        self.state.read().pending.clone()
    }

    /// Number of queued ids
    pub fn pending_count(&self) -> usize {
        self.state.read().pending.len()
    }

    /// Seal the pending queue plus a reward marker into the next block.
    ///
    /// The queue is cleared only once the block is appended; if the search
    /// fails the queue is left intact.
    #[tracing::instrument(skip(self))]
    pub fn mine_pending_transactions(&self, miner_address: &str) -> Result<Block> {
        let mut state = self.state.write();

        let mut transaction_ids = state.pending.clone();
        transaction_ids.push(mining_reward_marker(miner_address));

        let tip = state.tip();
        let candidate = Block::candidate(
            tip.index + 1,
            now(),
            transaction_ids,
            tip.hash.clone(),
            state.difficulty,
        );

        let block = seal(&self.miner, candidate, &self.metrics)?;
        state.blocks.push(block.clone());
        state.pending.clear();

        info!(
            "[lc-03] Mined block #{} with {} ids: hash={} nonce={}",
            block.index,
            block.transaction_ids.len(),
            block.hash,
            block.nonce
        );
        Ok(block)
    }

    /// Walk the chain from block 1 and report the first violation.
    ///
    /// Each block must (a) hash to its stored hash, (b) link to the prior
    /// block's hash and (c) meet its recorded difficulty.
    pub fn validate_chain_report(&self) -> ChainValidation {
        let state = self.state.read();

        for pair in state.blocks.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);

            let kind = if current.hash != current.compute_hash() {
                Some(ViolationKind::HashMismatch)
            } else if current.previous_hash != previous.hash {
                Some(ViolationKind::BrokenLink)
            } else if !current.meets_difficulty() {
                Some(ViolationKind::InsufficientWork)
            } else {
                None
            };

            if let Some(kind) = kind {
                warn!(
                    "[lc-03] Chain invalid at block #{}: {:?}",
                    current.index, kind
                );
                return ChainValidation::Invalid {
                    index: current.index,
                    kind,
                };
            }
        }
        ChainValidation::Valid
    }

    /// Whether every block after genesis checks out
    pub fn validate_chain(&self) -> bool {
        self.validate_chain_report().is_valid()
    }

    /// Step difficulty by one toward `target_block_time_secs`.
    ///
    /// Needs `adjustment_window + 1` blocks; otherwise nothing changes.
    /// Returns the difficulty now in effect for the next block.
    pub fn adjust_difficulty(&self, target_block_time_secs: i64) -> u32 {
        let mut state = self.state.write();

        let keep = self.adjuster.window() + 1;
        let skip = state.blocks.len().saturating_sub(keep);
        let timestamps: Vec<i64> = state.blocks[skip..].iter().map(|b| b.timestamp).collect();

        let previous = state.difficulty;
        let next = self
            .adjuster
            .next_difficulty(previous, &timestamps, target_block_time_secs);
        if next != previous {
            info!("[lc-03] Difficulty adjusted: {} -> {}", previous, next);
        }
        state.difficulty = next;
        next
    }

    /// [`Self::adjust_difficulty`] with the configured target
    pub fn adjust_difficulty_to_target(&self) -> u32 {
        self.adjust_difficulty(self.config.target_block_time_secs)
    }

    /// Block at `index`, if any
    pub fn block_by_index(&self, index: u64) -> Option<Block> {
        let state = self.state.read();
        usize::try_from(index)
            .ok()
            .and_then(|i| state.blocks.get(i))
            .cloned()
    }

    /// Current chain tip
    pub fn latest_block(&self) -> Block {
        self.state.read().tip().clone()
    }

    /// Number of blocks, genesis included
    pub fn chain_length(&self) -> usize {
        self.state.read().blocks.len()
    }

    /// Snapshot of the whole chain
    pub fn blocks(&self) -> Vec<Block> {
        self.state.read().blocks.clone()
    }

    /// Difficulty that the next block will be mined at
    pub fn difficulty(&self) -> u32 {
        self.state.read().difficulty
    }

    /// Configuration the ledger was built with
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Mining metrics
    pub fn metrics(&self) -> &LedgerMetrics {
        &self.metrics
    }

    /// Mutate a stored block in place, bypassing every invariant.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn tamper_with<F>(&self, index: u64, f: F) -> Result<()>
    where
        F: FnOnce(&mut Block),
    {
        let mut state = self.state.write();
        let block = usize::try_from(index)
            .ok()
            .and_then(|i| state.blocks.get_mut(i))
            .ok_or(LedgerError::BlockNotFound { index })?;
        f(block);
        Ok(())
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Run the PoW search on a candidate and fill in nonce and hash.
fn seal(miner: &PoWMiner, mut candidate: Block, metrics: &LedgerMetrics) -> Result<Block> {
    let started = Instant::now();
    let found = miner.mine(&candidate).ok_or(LedgerError::MiningFailed {
        difficulty: candidate.difficulty,
    })?;

    candidate.nonce = found.nonce;
    candidate.hash = found.hash;
    metrics.record_block_mined(
        candidate.transaction_ids.len(),
        candidate.nonce,
        started.elapsed().as_millis() as u64,
    );
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn ledger(difficulty: u32) -> Ledger {
        Ledger::new(LedgerConfig {
            difficulty,
            mining_threads: 2,
            ..LedgerConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_genesis_invariant() {
        for difficulty in 1..=3 {
            let ledger = ledger(difficulty);
            assert_eq!(ledger.chain_length(), 1);

            let genesis = ledger.latest_block();
            assert_eq!(genesis.index, 0);
            assert_eq!(genesis.previous_hash, "0");
            assert!(genesis.transaction_ids.is_empty());
            assert!(genesis.hash.starts_with(&"0".repeat(difficulty as usize)));
            assert_eq!(genesis.hash, genesis.compute_hash());
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            Ledger::with_difficulty(0),
            Err(LedgerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_mining_drains_pending_pool() {
        let ledger = ledger(2);
        ledger.add_pending_transaction("t1");
        ledger.add_pending_transaction("t2");
        assert_eq!(ledger.pending_transactions(), vec!["t1", "t2"]);

        let block = ledger.mine_pending_transactions("miner").unwrap();

        assert!(ledger.pending_transactions().is_empty());
        assert_eq!(
            block.transaction_ids,
            vec!["t1", "t2", "MINING_REWARD:miner"]
        );
        assert_eq!(block.index, 1);
        assert_eq!(ledger.latest_block(), block);
    }

    #[test]
    fn test_empty_pool_still_mines_reward_marker() {
        let ledger = ledger(1);
        let block = ledger.mine_pending_transactions("m").unwrap();
        assert_eq!(block.transaction_ids, vec!["MINING_REWARD:m"]);
    }

    #[test]
    fn test_proof_of_work_satisfied() {
        let difficulty = 3;
        let ledger = ledger(difficulty);
        for i in 0..3 {
            ledger.add_pending_transaction(format!("tx-{}", i));
            ledger.mine_pending_transactions("miner").unwrap();
        }
        for block in ledger.blocks() {
            assert!(block.hash.starts_with("000"));
            assert_eq!(block.difficulty, difficulty);
        }
    }

    #[test]
    fn test_chain_links() {
        let ledger = ledger(1);
        ledger.mine_pending_transactions("a").unwrap();
        ledger.mine_pending_transactions("b").unwrap();

        let blocks = ledger.blocks();
        for pair in blocks.windows(2) {
            assert_eq!(pair[1].previous_hash, pair[0].hash);
            assert_eq!(pair[1].index, pair[0].index + 1);
        }
        assert!(ledger.validate_chain());
    }

    #[test]
    fn test_tampered_transactions_detected() {
        let ledger = ledger(2);
        ledger.add_pending_transaction("t1");
        ledger.mine_pending_transactions("miner").unwrap();
        assert!(ledger.validate_chain());

        ledger
            .tamper_with(1, |block| block.transaction_ids[0] = "forged".into())
            .unwrap();

        assert!(!ledger.validate_chain());
        assert_eq!(
            ledger.validate_chain_report(),
            ChainValidation::Invalid {
                index: 1,
                kind: ViolationKind::HashMismatch
            }
        );
    }

    #[test]
    fn test_rehashed_tamper_breaks_link() {
        let ledger = ledger(1);
        ledger.mine_pending_transactions("a").unwrap();
        ledger.mine_pending_transactions("b").unwrap();

        // Forge block 1 and recompute its hash: block 2 no longer links
        ledger
            .tamper_with(1, |block| {
                block.transaction_ids.push("forged".into());
                block.hash = block.compute_hash();
            })
            .unwrap();

        let report = ledger.validate_chain_report();
        assert!(!report.is_valid());
        assert!(matches!(
            report,
            ChainValidation::Invalid {
                index: 1 | 2,
                ..
            }
        ));
    }

    #[test]
    fn test_insufficient_work_detected() {
        let ledger = ledger(1);
        ledger.mine_pending_transactions("a").unwrap();

        // Search for a nonce whose hash does NOT start with '0', then seal with it
        ledger
            .tamper_with(1, |block| {
                let mut nonce = 0;
                loop {
                    block.nonce = nonce;
                    block.hash = block.compute_hash();
                    if !block.meets_difficulty() {
                        break;
                    }
                    nonce += 1;
                }
            })
            .unwrap();

        assert_eq!(
            ledger.validate_chain_report(),
            ChainValidation::Invalid {
                index: 1,
                kind: ViolationKind::InsufficientWork
            }
        );
    }

    #[test]
    fn test_tamper_out_of_range() {
        let ledger = ledger(1);
        assert_eq!(
            ledger.tamper_with(9, |_| {}),
            Err(LedgerError::BlockNotFound { index: 9 })
        );
    }

    #[test]
    fn test_queries() {
        let ledger = ledger(1);
        let block = ledger.mine_pending_transactions("m").unwrap();

        assert_eq!(ledger.block_by_index(1), Some(block));
        assert!(ledger.block_by_index(2).is_none());
        assert_eq!(ledger.blocks().len(), 2);
        assert_eq!(ledger.difficulty(), 1);
        assert_eq!(ledger.metrics().get_blocks_mined(), 2);
    }

    #[test]
    fn test_adjust_difficulty_needs_full_window() {
        let ledger = Ledger::new(LedgerConfig {
            difficulty: 1,
            mining_threads: 1,
            adjustment_window: 2,
            ..LedgerConfig::default()
        })
        .unwrap();

        ledger.mine_pending_transactions("m").unwrap();
        // Two blocks: one interval, window needs two
        assert_eq!(ledger.adjust_difficulty(10), 1);

        ledger.mine_pending_transactions("m").unwrap();
        ledger
            .tamper_with(0, |b| b.timestamp -= 1_000)
            .unwrap();
        // Average interval now far above target: floor holds at 1
        assert_eq!(ledger.adjust_difficulty(10), 1);
    }

    #[test]
    fn test_adjust_difficulty_steps_up_for_fast_blocks() {
        let ledger = Ledger::new(LedgerConfig {
            difficulty: 1,
            mining_threads: 1,
            adjustment_window: 2,
            ..LedgerConfig::default()
        })
        .unwrap();
        ledger.mine_pending_transactions("m").unwrap();
        ledger.mine_pending_transactions("m").unwrap();

        // Blocks mined within the same second or two: well under a 60s target
        assert_eq!(ledger.adjust_difficulty(60), 2);
        let next = ledger.mine_pending_transactions("m").unwrap();
        assert_eq!(next.difficulty, 2);
        assert!(next.hash.starts_with("00"));
        assert!(ledger.validate_chain());
    }

    #[test]
    fn test_concurrent_submitters_lose_nothing() {
        let ledger = Arc::new(ledger(2));
        let submitters: Vec<_> = (0..4)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for i in 0..25 {
                        ledger.add_pending_transaction(format!("tx-{}-{}", t, i));
                    }
                })
            })
            .collect();

        let miner = {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for _ in 0..3 {
                    ledger.mine_pending_transactions("miner").unwrap();
                }
            })
        };

        for handle in submitters {
            handle.join().unwrap();
        }
        miner.join().unwrap();
        ledger.mine_pending_transactions("miner").unwrap();

        let included: Vec<String> = ledger
            .blocks()
            .into_iter()
            .flat_map(|b| b.transaction_ids)
            .filter(|id| id.starts_with("tx-"))
            .collect();
        let mut unique = included.clone();
        unique.sort();
        unique.dedup();

        assert_eq!(included.len(), 100);
        assert_eq!(unique.len(), 100);
        assert!(ledger.pending_transactions().is_empty());
        assert!(ledger.validate_chain());
    }

    #[test]
    fn test_batches_never_split_across_blocks() {
        let ledger = Arc::new(ledger(1));
        let batchers: Vec<_> = (0..4)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for round in 0..5 {
                        ledger.add_pending_transactions(
                            (0..8).map(|i| format!("batch-{}-{}-{}", t, round, i)),
                        );
                    }
                })
            })
            .collect();

        let miner = {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for _ in 0..5 {
                    ledger.mine_pending_transactions("miner").unwrap();
                }
            })
        };

        for handle in batchers {
            handle.join().unwrap();
        }
        miner.join().unwrap();
        ledger.mine_pending_transactions("miner").unwrap();

        let mut total = 0;
        for block in ledger.blocks() {
            let mut per_batch: std::collections::HashMap<String, usize> =
                std::collections::HashMap::new();
            for id in block.transaction_ids.iter().filter(|id| id.starts_with("batch-")) {
                let batch = id.rsplit_once('-').map(|(b, _)| b.to_string()).unwrap();
                *per_batch.entry(batch).or_default() += 1;
            }
            for count in per_batch.values() {
                assert_eq!(*count, 8);
                total += count;
            }
        }
        assert_eq!(total, 4 * 5 * 8);
    }

    #[test]
    fn test_fifo_order_per_submitter() {
        let ledger = ledger(1);
        for i in 0..10 {
            ledger.add_pending_transaction(format!("{}", i));
        }
        let block = ledger.mine_pending_transactions("m").unwrap();
        let expected: Vec<String> = (0..10)
            .map(|i| i.to_string())
            .chain(std::iter::once("MINING_REWARD:m".to_string()))
            .collect();
        assert_eq!(block.transaction_ids, expected);
    }
}
