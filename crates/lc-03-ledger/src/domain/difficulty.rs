//! Difficulty adjustment
//!
//! Step rule over a fixed window of block intervals:
//!
//! ```text
//! avg = (ts[last] - ts[last - window]) / window      (integer seconds)
//! avg < target  -> difficulty + 1   (capped at 64)
//! avg > target  -> difficulty - 1   (floor 1)
//! avg == target -> unchanged
//! ```
//!
//! A window of `w` intervals needs `w + 1` blocks. With fewer blocks the
//! difficulty is left alone.

use crate::config::MAX_DIFFICULTY;

/// Step-wise difficulty adjuster
#[derive(Clone, Debug)]
pub struct DifficultyAdjuster {
    window: usize,
}

impl DifficultyAdjuster {
    /// Create an adjuster averaging over `window` intervals (minimum 1)
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    /// Number of intervals averaged
    pub fn window(&self) -> usize {
        self.window
    }

    /// Average seconds per block over the window, if enough blocks exist.
    ///
    /// `timestamps` are block timestamps in chain order (oldest first).
    pub fn average_block_time(&self, timestamps: &[i64]) -> Option<i64> {
        if timestamps.len() <= self.window {
            return None;
        }
        let last = timestamps[timestamps.len() - 1];
        let first = timestamps[timestamps.len() - 1 - self.window];
        Some((last - first) / self.window as i64)
    }

    /// Next difficulty given the current one and the chain's timestamps
    pub fn next_difficulty(&self, current: u32, timestamps: &[i64], target_secs: i64) -> u32 {
        let Some(avg) = self.average_block_time(timestamps) else {
            return current;
        };

        if avg < target_secs {
            (current + 1).min(MAX_DIFFICULTY)
        } else if avg > target_secs && current > 1 {
            current - 1
        } else {
            current
        }
    }
}

impl Default for DifficultyAdjuster {
    fn default() -> Self {
        Self::new(10)
    }
}
