//! Egg drop: minimize the worst-case number of drops needed to find the
//! critical floor of a building.
//!
//! The table is filled bottom-up. Row `e` (eggs available) depends only on
//! row `e - 1` and on smaller floor counts of row `e`, so every entry is
//! computed before it is read.
//!
//! ## Recurrence
//!
//! Dropping from floor `t` out of `f` remaining floors either breaks the egg
//! (search the `t - 1` floors below with one egg fewer) or not (search the
//! `f - t` floors above with the same eggs):
//!
//! ```text
//! cost(e, f) = min over t in 1..=f of 1 + max(cost(e - 1, t - 1), cost(e, f - t))
//! cost(1, f) = f
//! cost(e, 0) = 0
//! ```

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PrimerError, Result};

/// One table entry: the floor to test first and the worst-case drop count.
///
/// `test_floor` is relative to the bottom of the remaining window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropStrategy {
    pub test_floor: usize,
    pub worst_case_drops: usize,
}

impl DropStrategy {
    pub const EMPTY: DropStrategy = DropStrategy {
        test_floor: 0,
        worst_case_drops: 0,
    };
}

/// A single drop made while replaying the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropAttempt {
    /// Absolute floor the egg was dropped from (1-based).
    pub floor: usize,
    pub broke: bool,
    /// Eggs left after this drop.
    pub eggs_left: usize,
}

/// Result of replaying the optimal strategy against a known critical floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchTrace {
    pub drops: Vec<DropAttempt>,
    /// Highest floor from which an egg survives, as identified by the search.
    pub highest_safe: usize,
}

/// Bottom-up egg-drop table for `1..=eggs` eggs and `0..=floors` floors.
#[derive(Debug, Clone)]
pub struct EggDropTable {
    eggs: usize,
    floors: usize,
    /// Row-major: `cells[(e - 1) * (floors + 1) + f]`.
    cells: Vec<DropStrategy>,
}

impl EggDropTable {
    /// Fill the table for every egg count up to `eggs` and every floor count up to `floors`.
    pub fn build(eggs: usize, floors: usize) -> Result<Self> {
        if eggs == 0 {
            return Err(PrimerError::NoEggs);
        }
        let start = Instant::now();
        let stride = floors + 1;
        let mut cells = vec![DropStrategy::EMPTY; eggs * stride];

        // One egg: linear search from the bottom.
        for f in 1..=floors {
            cells[f] = DropStrategy {
                test_floor: 1,
                worst_case_drops: f,
            };
        }

        for e in 2..=eggs {
            let below = (e - 2) * stride;
            let row = (e - 1) * stride;
            for f in 1..=floors {
                let mut best = DropStrategy {
                    test_floor: 0,
                    worst_case_drops: usize::MAX,
                };
                for t in 1..=f {
                    let if_break = cells[below + t - 1].worst_case_drops;
                    let if_survive = cells[row + f - t].worst_case_drops;
                    let worst = 1 + if_break.max(if_survive);
                    if worst < best.worst_case_drops {
                        best = DropStrategy {
                            test_floor: t,
                            worst_case_drops: worst,
                        };
                    }
                }
                cells[row + f] = best;
            }
            debug!(
                eggs = e,
                worst_case = cells[row + floors].worst_case_drops,
                "egg row filled"
            );
        }

        info!(
            eggs,
            floors,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "egg drop table built"
        );
        Ok(Self {
            eggs,
            floors,
            cells,
        })
    }

    pub fn eggs(&self) -> usize {
        self.eggs
    }

    pub fn floors(&self) -> usize {
        self.floors
    }

    #[inline]
    fn index(&self, eggs: usize, floors: usize) -> Option<usize> {
        if eggs == 0 || eggs > self.eggs || floors > self.floors {
            return None;
        }
        Some((eggs - 1) * (self.floors + 1) + floors)
    }

    /// Strategy for `eggs` eggs and `floors` remaining floors, if inside the table.
    pub fn get(&self, eggs: usize, floors: usize) -> Option<DropStrategy> {
        self.index(eggs, floors).map(|i| self.cells[i])
    }

    pub fn worst_case(&self, eggs: usize, floors: usize) -> Option<usize> {
        self.get(eggs, floors).map(|s| s.worst_case_drops)
    }

    pub fn best_test_floor(&self, eggs: usize, floors: usize) -> Option<usize> {
        self.get(eggs, floors).map(|s| s.test_floor)
    }

    /// Strategies for every egg count (1..=eggs) at a fixed floor count.
    pub fn column(&self, floors: usize) -> Option<Vec<DropStrategy>> {
        if floors > self.floors {
            return None;
        }
        Some(
            (1..=self.eggs)
                .filter_map(|e| self.get(e, floors))
                .collect(),
        )
    }

    /// Replay the optimal strategy with all eggs over the full building.
    ///
    /// Floors `1..=highest_safe` are safe; every floor above breaks an egg.
    pub fn search(&self, highest_safe: usize) -> Result<SearchTrace> {
        if highest_safe > self.floors {
            return Err(PrimerError::SafeFloorOutOfRange {
                safe: highest_safe,
                floors: self.floors,
            });
        }

        let mut eggs = self.eggs;
        let mut known_safe = 0;
        let mut remaining = self.floors;
        let mut drops = Vec::new();

        while remaining > 0 && eggs > 0 {
            let Some(strategy) = self.get(eggs, remaining) else {
                break;
            };
            let floor = known_safe + strategy.test_floor;
            let broke = floor > highest_safe;
            if broke {
                eggs -= 1;
                remaining = strategy.test_floor - 1;
            } else {
                known_safe = floor;
                remaining -= strategy.test_floor;
            }
            drops.push(DropAttempt {
                floor,
                broke,
                eggs_left: eggs,
            });
        }

        Ok(SearchTrace {
            drops,
            highest_safe: known_safe,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_eggs_hundred_floors_needs_fourteen() {
        let table = EggDropTable::build(2, 100).unwrap();
        assert_eq!(table.worst_case(2, 100), Some(14));
        // 14 + 13 + ... + 1 = 105 >= 100, so the first drop is at most floor 14.
        let first = table.best_test_floor(2, 100).unwrap();
        assert!((1..=14).contains(&first), "first={first}");
    }

    #[test]
    fn base_cases() {
        let table = EggDropTable::build(4, 30).unwrap();
        for f in 0..=30 {
            assert_eq!(table.worst_case(1, f), Some(f));
        }
        for e in 1..=4 {
            assert_eq!(
                table.get(e, 0),
                Some(DropStrategy {
                    test_floor: 0,
                    worst_case_drops: 0
                })
            );
        }
        assert_eq!(table.best_test_floor(1, 17), Some(1));
    }

    #[test]
    fn known_values() {
        let table = EggDropTable::build(7, 100).unwrap();
        assert_eq!(table.worst_case(2, 36), Some(8));
        assert_eq!(table.worst_case(3, 100), Some(9));
        assert_eq!(table.worst_case(7, 100), Some(7));
    }

    #[test]
    fn out_of_range_lookups() {
        let table = EggDropTable::build(2, 10).unwrap();
        assert_eq!(table.get(0, 5), None);
        assert_eq!(table.get(3, 5), None);
        assert_eq!(table.get(2, 11), None);
        assert!(table.column(11).is_none());
        assert_eq!(table.column(10).unwrap().len(), 2);
    }

    #[test]
    fn zero_eggs_rejected() {
        assert!(matches!(EggDropTable::build(0, 10), Err(PrimerError::NoEggs)));
    }

    #[test]
    fn search_finds_every_critical_floor() {
        let table = EggDropTable::build(2, 100).unwrap();
        let mut hardest = 0;
        for safe in 0..=100 {
            let trace = table.search(safe).unwrap();
            assert_eq!(trace.highest_safe, safe);
            assert!(trace.drops.len() <= 14, "safe={safe} took {}", trace.drops.len());
            hardest = hardest.max(trace.drops.len());
        }
        assert_eq!(hardest, 14);
    }

    #[test]
    fn search_rejects_floor_above_building() {
        let table = EggDropTable::build(2, 10).unwrap();
        assert!(matches!(
            table.search(11),
            Err(PrimerError::SafeFloorOutOfRange { safe: 11, floors: 10 })
        ));
    }

    #[test]
    fn single_egg_search_is_linear() {
        let table = EggDropTable::build(1, 5).unwrap();
        let trace = table.search(3).unwrap();
        let floors: Vec<usize> = trace.drops.iter().map(|d| d.floor).collect();
        assert_eq!(floors, vec![1, 2, 3, 4]);
        assert!(trace.drops[3].broke);
        assert_eq!(trace.highest_safe, 3);
    }
}
