//! Proof-of-work nonce search

use super::entities::Block;
use crate::utils::hashing::{hash_with_nonce, meets_difficulty};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of a successful search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seal {
    /// Winning nonce
    pub nonce: u64,
    /// Hash produced with that nonce
    pub hash: String,
}

/// Parallel PoW miner.
///
/// Nonces are interleaved across threads: thread `t` of `n` tries
/// `1 + t, 1 + t + n, ...`. With one thread this is the plain linear search
/// starting at nonce 1. The search is unbounded and has no timeout.
#[derive(Clone, Debug)]
pub struct PoWMiner {
    num_threads: usize,
}

impl PoWMiner {
    /// How often a worker checks whether another thread already won
    const FOUND_CHECK_INTERVAL: u64 = 1024;

    /// Create a miner with the given thread count (minimum 1)
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: num_threads.max(1),
        }
    }

    /// Number of search threads
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Search for a nonce whose hash meets the candidate's difficulty.
    ///
    /// Returns `None` only if the whole nonce space is exhausted.
    #[tracing::instrument(skip(self, candidate), fields(threads = self.num_threads, index = candidate.index))]
    pub fn mine(&self, candidate: &Block) -> Option<Seal> {
        let prefix = candidate.hash_prefix();
        let difficulty = candidate.difficulty;

        if self.num_threads == 1 {
            return Self::search(&prefix, difficulty, 1, 1, &AtomicBool::new(false));
        }

        let found = AtomicBool::new(false);
        let winner: Mutex<Option<Seal>> = Mutex::new(None);
        let step = self.num_threads as u64;

        std::thread::scope(|scope| {
            for thread_id in 0..self.num_threads {
                let prefix = &prefix;
                let found = &found;
                let winner = &winner;
                scope.spawn(move || {
                    let start = 1 + thread_id as u64;
                    if let Some(seal) = Self::search(prefix, difficulty, start, step, found) {
                        let mut slot = winner.lock();
                        // Lowest nonce wins when two threads finish together
                        match slot.as_ref() {
                            Some(existing) if existing.nonce <= seal.nonce => {}
                            _ => *slot = Some(seal),
                        }
                        found.store(true, Ordering::Relaxed);
                    }
                });
            }
        });

        let seal = winner.into_inner();
        match &seal {
            Some(s) => tracing::debug!("PoW search finished: nonce={}", s.nonce),
            None => tracing::warn!("PoW search exhausted nonce space"),
        }
        seal
    }

    fn search(
        prefix: &[u8],
        difficulty: u32,
        start: u64,
        step: u64,
        found: &AtomicBool,
    ) -> Option<Seal> {
        let mut nonce = start;
        let mut attempts: u64 = 0;
        loop {
            let hash = hash_with_nonce(prefix, nonce, difficulty);
            if meets_difficulty(&hash, difficulty) {
                return Some(Seal { nonce, hash });
            }

            attempts += 1;
            if attempts % Self::FOUND_CHECK_INTERVAL == 0 && found.load(Ordering::Relaxed) {
                return None;
            }
            nonce = nonce.checked_add(step)?;
        }
    }
}

impl Default for PoWMiner {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
