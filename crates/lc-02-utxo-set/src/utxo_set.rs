//! UTXO registry

use crate::error::{Result, UtxoError};
use parking_lot::RwLock;
use shared_crypto::sha256_hex;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

/// A discrete, owned unit of value that can be spent exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utxo {
    /// Output id (lowercase hex)
    pub id: String,
    /// Owning wallet id
    pub owner: String,
    /// Value, never negative
    pub amount: i64,
    /// Whether the output has been consumed
    pub spent: bool,
}

/// Outputs in creation order plus an id index.
#[derive(Default)]
struct State {
    outputs: Vec<Utxo>,
    index: HashMap<String, usize>,
}

impl State {
    fn insert(&mut self, id: String, owner: &str, amount: i64) -> Result<String> {
        if amount < 0 {
            return Err(UtxoError::InvalidAmount { amount });
        }
        if self.index.contains_key(&id) {
            return Err(UtxoError::DuplicateOutput { id });
        }

        self.index.insert(id.clone(), self.outputs.len());
        self.outputs.push(Utxo {
            id: id.clone(),
            owner: owner.to_string(),
            amount,
            spent: false,
        });
        Ok(id)
    }

    /// Check that `id` can be spent by `owner` without mutating anything.
    fn check_spendable(&self, id: &str, owner: &str) -> Result<usize> {
        let Some(&pos) = self.index.get(id) else {
            return Err(UtxoError::NotFound { id: id.to_string() });
        };
        let utxo = &self.outputs[pos];
        if utxo.owner != owner {
            return Err(UtxoError::OwnerMismatch {
                id: id.to_string(),
                owner: utxo.owner.clone(),
                claimed: owner.to_string(),
            });
        }
        if utxo.spent {
            return Err(UtxoError::AlreadySpent { id: id.to_string() });
        }
        Ok(pos)
    }

    fn unspent_of<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a Utxo> + 'a {
        self.outputs
            .iter()
            .filter(move |u| !u.spent && u.owner == owner)
    }
}

/// Concurrency-safe set of outputs.
///
/// One lock guards the whole set. Mutations take the write side; snapshots
/// take the read side.
#[derive(Default)]
pub struct UtxoSet {
    state: RwLock<State>,
}

impl UtxoSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new unspent output from a funding operation.
    ///
    /// The id is `sha256(owner ":" amount ":" set_size)`. The set size grows
    /// on every insertion, so repeated funding of the same owner and amount
    /// still yields distinct ids.
    pub fn add_output(&self, owner: &str, amount: i64) -> Result<String> {
        let mut state = self.state.write();
        let id = sha256_hex(format!("{}:{}:{}", owner, amount, state.outputs.len()).as_bytes());
        let id = state.insert(id, owner, amount)?;
        debug!("[lc-02] Funded {} with {} as {}", owner, amount, id);
        Ok(id)
    }

    /// Create the `index`-th output of a settled transaction.
    ///
    /// The id is `sha256(tx_id ":" index)`; re-adding the same output fails
    /// with [`UtxoError::DuplicateOutput`].
    pub fn add_transaction_output(
        &self,
        tx_id: &str,
        index: u32,
        owner: &str,
        amount: i64,
    ) -> Result<String> {
        let id = Self::transaction_output_id(tx_id, index);
        let id = self.state.write().insert(id, owner, amount)?;
        debug!("[lc-02] Output {}:{} -> {} ({})", tx_id, index, owner, amount);
        Ok(id)
    }

    /// Id assigned to the `index`-th output of `tx_id`.
    pub fn transaction_output_id(tx_id: &str, index: u32) -> String {
        sha256_hex(format!("{}:{}", tx_id, index).as_bytes())
    }

    /// Mark an output spent iff it exists, is owned by `claimed_owner` and
    /// is unspent. Check and transition happen in one critical section.
    pub fn spend(&self, id: &str, claimed_owner: &str) -> Result<()> {
        let mut state = self.state.write();
        let pos = match state.check_spendable(id, claimed_owner) {
            Ok(pos) => pos,
            Err(err) => {
                if err.is_double_spend() {
                    warn!("[lc-02] Double-spend attempt on {} by {}", id, claimed_owner);
                }
                return Err(err);
            }
        };
        state.outputs[pos].spent = true;
        Ok(())
    }

    /// Spend every listed output atomically: all of them or none.
    ///
    /// Returns the summed amount of the consumed outputs.
    pub fn spend_all(&self, ids: &[String], claimed_owner: &str) -> Result<i64> {
        let mut state = self.state.write();

        let mut seen = HashSet::with_capacity(ids.len());
        let mut positions = Vec::with_capacity(ids.len());
        let mut total: i64 = 0;

        for id in ids {
            if !seen.insert(id.as_str()) {
                warn!("[lc-02] Input {} listed twice by {}", id, claimed_owner);
                return Err(UtxoError::DuplicateInput { id: id.clone() });
            }
            let pos = state.check_spendable(id, claimed_owner).inspect_err(|err| {
                if err.is_double_spend() {
                    warn!("[lc-02] Double-spend attempt on {} by {}", id, claimed_owner);
                }
            })?;
            total = total
                .checked_add(state.outputs[pos].amount)
                .ok_or(UtxoError::Overflow)?;
            positions.push(pos);
        }

        for pos in positions {
            state.outputs[pos].spent = true;
        }
        Ok(total)
    }

    /// Sum of all unspent outputs owned by `owner`.
    pub fn balance_of(&self, owner: &str) -> i64 {
        self.state
            .read()
            .unspent_of(owner)
            .fold(0i64, |acc, u| acc.saturating_add(u.amount))
    }

    /// Snapshot of the unspent outputs owned by `owner`, oldest first.
    pub fn unspent_outputs_of(&self, owner: &str) -> Vec<Utxo> {
        self.state.read().unspent_of(owner).cloned().collect()
    }

    /// Greedy input selection: take outputs oldest first until `amount` is
    /// covered.
    ///
    /// Works on a snapshot and reserves nothing; the caller must still spend
    /// the returned ids through [`Self::spend_all`], which can fail if another
    /// caller got there first.
    pub fn select_inputs(&self, owner: &str, amount: i64) -> Result<(Vec<String>, i64)> {
        if amount <= 0 {
            return Err(UtxoError::InvalidAmount { amount });
        }

        let state = self.state.read();
        let mut selected = Vec::new();
        let mut total: i64 = 0;

        for utxo in state.unspent_of(owner) {
            if total >= amount {
                break;
            }
            selected.push(utxo.id.clone());
            total = total.checked_add(utxo.amount).ok_or(UtxoError::Overflow)?;
        }

        if total < amount {
            return Err(UtxoError::InsufficientFunds {
                owner: owner.to_string(),
                required: amount,
                available: total,
            });
        }
        Ok((selected, total))
    }

    /// Snapshot lookup by id.
    pub fn get(&self, id: &str) -> Option<Utxo> {
        let state = self.state.read();
        state.index.get(id).map(|&pos| state.outputs[pos].clone())
    }

    /// Balance of every owner holding at least one unspent output, sorted by
    /// wallet id.
    pub fn balances(&self) -> Vec<(String, i64)> {
        let state = self.state.read();
        let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
        for utxo in state.outputs.iter().filter(|u| !u.spent) {
            let entry = totals.entry(utxo.owner.as_str()).or_insert(0);
            *entry = entry.saturating_add(utxo.amount);
        }
        totals
            .into_iter()
            .map(|(owner, balance)| (owner.to_string(), balance))
            .collect()
    }

    /// Total number of outputs, spent ones included.
    pub fn len(&self) -> usize {
        self.state.read().outputs.len()
    }

    /// Whether the set holds no outputs at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of outputs not yet spent.
    pub fn unspent_count(&self) -> usize {
        self.state.read().outputs.iter().filter(|u| !u.spent).count()
    }
}
