//! 0/1 knapsack solved top-down with an explicit memo.
//!
//! A state is `(items_remaining, capacity_remaining)`. Items are decided front
//! to back, so the item under decision at a state is
//! `items[items.len() - items_remaining]`. Every transition decrements
//! `items_remaining`, which makes the state space a DAG and the memo sound.
//!
//! Evaluation walks the DAG with an explicit work stack instead of recursion,
//! so deep item lists cannot exhaust the call stack.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::BRUTE_FORCE_MAX_ITEMS;
use crate::error::{PrimerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub weight: u64,
    pub value: u64,
}

impl Item {
    pub fn new(weight: u64, value: u64) -> Self {
        Self { weight, value }
    }
}

/// Pair `weights[i]` with `values[i]`.
pub fn items_from_columns(weights: &[u64], values: &[u64]) -> Result<Vec<Item>> {
    if weights.len() != values.len() {
        return Err(PrimerError::LengthMismatch {
            left: weights.len(),
            right: values.len(),
        });
    }
    Ok(weights
        .iter()
        .zip(values)
        .map(|(&weight, &value)| Item { weight, value })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KnapsackState {
    pub items_remaining: usize,
    pub capacity_remaining: u64,
}

impl KnapsackState {
    pub fn new(items_remaining: usize, capacity_remaining: u64) -> Self {
        Self {
            items_remaining,
            capacity_remaining,
        }
    }

    #[inline]
    fn is_terminal(&self) -> bool {
        self.items_remaining == 0 || self.capacity_remaining == 0
    }

    #[inline]
    fn exclude(&self) -> KnapsackState {
        KnapsackState::new(self.items_remaining - 1, self.capacity_remaining)
    }

    #[inline]
    fn include(&self, weight: u64) -> Option<KnapsackState> {
        (weight <= self.capacity_remaining)
            .then(|| KnapsackState::new(self.items_remaining - 1, self.capacity_remaining - weight))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Include,
    Exclude,
}

/// Memo value: best attainable value from a state and the decision that achieves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoEntry {
    pub value: u64,
    pub decision: Decision,
}

impl MemoEntry {
    const TERMINAL: MemoEntry = MemoEntry {
        value: 0,
        decision: Decision::Exclude,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnapsackSolution {
    pub value: u64,
    pub total_weight: u64,
    /// `(item_index, decision)` for every item decided from the start state.
    pub decisions: Vec<(usize, Decision)>,
    /// Indices of included items, ascending.
    pub chosen: Vec<usize>,
}

/// Top-down knapsack solver owning its item list and memo.
///
/// The memo persists across calls, so solving several capacities of the
/// same item list reuses shared sub-problems.
pub struct KnapsackSolver {
    items: Vec<Item>,
    memo: HashMap<KnapsackState, MemoEntry>,
}

impl KnapsackSolver {
    pub fn new(items: Vec<Item>) -> Result<Self> {
        if let Some(index) = items.iter().position(|it| it.weight == 0) {
            return Err(PrimerError::ZeroWeightItem { index });
        }
        // Any subset's value is bounded by the total, so sums below cannot overflow.
        total_value(&items)?;
        Ok(Self {
            items,
            memo: HashMap::new(),
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Memo entry for `state`, if it has been evaluated.
    pub fn lookup(&self, state: KnapsackState) -> Option<MemoEntry> {
        self.memo.get(&state).copied()
    }

    #[inline]
    fn item_index(&self, state: KnapsackState) -> usize {
        self.items.len() - state.items_remaining
    }

    fn check_state(&self, state: KnapsackState) -> Result<()> {
        if state.items_remaining > self.items.len() {
            return Err(PrimerError::ItemsOutOfRange {
                requested: state.items_remaining,
                available: self.items.len(),
            });
        }
        Ok(())
    }

    /// Best value and decision at `state`.
    pub fn solve_state(&mut self, state: KnapsackState) -> Result<MemoEntry> {
        self.check_state(state)?;
        if let Some(entry) = self.lookup(state) {
            return Ok(entry);
        }

        let start = Instant::now();
        let before = self.memo.len();
        let mut stack = vec![state];

        while let Some(&top) = stack.last() {
            if self.memo.contains_key(&top) {
                stack.pop();
                continue;
            }
            if top.is_terminal() {
                self.memo.insert(top, MemoEntry::TERMINAL);
                stack.pop();
                continue;
            }

            let item = self.items[self.item_index(top)];
            let exclude = top.exclude();
            let include = top.include(item.weight);

            // Children first; this state is revisited once they are memoized.
            let mut pending = false;
            for child in std::iter::once(exclude).chain(include) {
                if !self.memo.contains_key(&child) {
                    stack.push(child);
                    pending = true;
                }
            }
            if pending {
                continue;
            }

            let mut entry = MemoEntry {
                value: self.memo[&exclude].value,
                decision: Decision::Exclude,
            };
            if let Some(child) = include {
                let total = item.value + self.memo[&child].value;
                if total > entry.value {
                    entry = MemoEntry {
                        value: total,
                        decision: Decision::Include,
                    };
                }
            }
            self.memo.insert(top, entry);
            stack.pop();
        }

        debug!(
            items_remaining = state.items_remaining,
            capacity = state.capacity_remaining,
            new_entries = self.memo.len() - before,
            elapsed_us = start.elapsed().as_micros() as u64,
            "knapsack state solved"
        );
        Ok(self.memo[&state])
    }

    /// Solve over all items with the given capacity.
    pub fn solve(&mut self, capacity: u64) -> Result<KnapsackSolution> {
        let solution = self.solve_from(KnapsackState::new(self.items.len(), capacity))?;
        info!(
            items = self.items.len(),
            capacity,
            value = solution.value,
            memo_entries = self.memo.len(),
            "knapsack solved"
        );
        Ok(solution)
    }

    /// Solve from `state` and reconstruct the decision sequence by walking the memo.
    pub fn solve_from(&mut self, state: KnapsackState) -> Result<KnapsackSolution> {
        let value = self.solve_state(state)?.value;

        let mut decisions = Vec::with_capacity(state.items_remaining);
        let mut chosen = Vec::new();
        let mut total_weight = 0;
        let mut current = state;

        while current.items_remaining > 0 {
            let index = self.item_index(current);
            let entry = self.solve_state(current)?;
            decisions.push((index, entry.decision));
            current = match entry.decision {
                Decision::Include => {
                    let weight = self.items[index].weight;
                    chosen.push(index);
                    total_weight += weight;
                    KnapsackState::new(
                        current.items_remaining - 1,
                        current.capacity_remaining - weight,
                    )
                }
                Decision::Exclude => current.exclude(),
            };
        }

        Ok(KnapsackSolution {
            value,
            total_weight,
            decisions,
            chosen,
        })
    }
}

/// Sum of all item values; errors if it does not fit in a `u64`.
pub fn total_value(items: &[Item]) -> Result<u64> {
    items
        .iter()
        .try_fold(0u64, |acc, it| acc.checked_add(it.value))
        .ok_or(PrimerError::ValueOverflow)
}

/// Exhaustive optimum over every subset. `Ok(None)` when there are more than
/// `BRUTE_FORCE_MAX_ITEMS` items.
pub fn brute_force(items: &[Item], capacity: u64) -> Result<Option<u64>> {
    if items.len() > BRUTE_FORCE_MAX_ITEMS {
        return Ok(None);
    }
    total_value(items)?;
    let mut best = 0;
    'subsets: for mask in 0u32..(1u32 << items.len()) {
        let (mut weight, mut value) = (0u64, 0u64);
        for (i, item) in items.iter().enumerate() {
            if mask & (1 << i) != 0 {
                // A weight sum past u64::MAX is past any capacity.
                weight = match weight.checked_add(item.weight) {
                    Some(w) => w,
                    None => continue 'subsets,
                };
                value += item.value;
            }
        }
        if weight <= capacity && value > best {
            best = value;
        }
    }
    Ok(Some(best))
}
