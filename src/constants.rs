//! Default problem sizes and the fixed board layouts.
//!
//! The board tables use 1-based square numbers as printed on the physical
//! boards; square 0 is the off-board start position.

/// Default egg count for `primers-egg-drop`.
pub const DEFAULT_EGGS: usize = 2;

/// Default building height for `primers-egg-drop`.
pub const DEFAULT_FLOORS: usize = 100;

/// Item weights of the demo knapsack instance.
pub const DEMO_WEIGHTS: [u64; 5] = [1, 2, 3, 4, 5];

/// Item values of the demo knapsack instance.
pub const DEMO_VALUES: [u64; 5] = [6, 8, 10, 13, 17];

/// Capacity of the demo knapsack instance.
pub const DEMO_CAPACITY: u64 = 9;

/// Largest item count `brute_force` will enumerate (2^20 subsets).
pub const BRUTE_FORCE_MAX_ITEMS: usize = 20;

/// Faces on the single die used by Chutes and Ladders.
pub const CHUTES_DIE_FACES: usize = 6;

/// Squares on the classic Chutes and Ladders board.
pub const CHUTES_BOARD_SQUARES: usize = 100;

/// Classic board ladders as (bottom, top).
pub const LADDERS: [(usize, usize); 9] = [
    (1, 38),
    (4, 14),
    (9, 31),
    (21, 42),
    (28, 84),
    (36, 44),
    (51, 67),
    (71, 91),
    (80, 100),
];

/// Classic board chutes as (top, bottom).
pub const CHUTES: [(usize, usize); 10] = [
    (16, 6),
    (47, 26),
    (49, 11),
    (56, 53),
    (62, 19),
    (64, 60),
    (87, 24),
    (93, 73),
    (95, 75),
    (98, 78),
];

/// Squares on the toy board whose last square is only reachable by a chute.
pub const DEATH_BOARD_SQUARES: usize = 10;

/// Square on the toy board whose chute leads to the last square.
pub const DEATH_CHUTE_SQUARE: usize = 6;

/// Columns per row in the snake-layout board projection.
pub const BOARD_COLUMNS: usize = 10;

/// Squares on a Monopoly board (GO is square 0).
pub const MONOPOLY_SQUARES: usize = 40;

/// Dice rolled per Monopoly turn.
pub const MONOPOLY_DICE: usize = 2;

/// Faces per Monopoly die.
pub const MONOPOLY_DIE_FACES: usize = 6;

/// The "Go To Jail" square.
pub const GO_TO_JAIL_SQUARE: usize = 30;

/// The "Jail" square.
pub const JAIL_SQUARE: usize = 10;

/// A state whose self-transition is at least `1 - ABSORBING_EPSILON` is absorbing.
pub const ABSORBING_EPSILON: f64 = 1e-12;

/// Row-sum tolerance for stochastic matrices.
pub const STOCHASTIC_TOLERANCE: f64 = 1e-9;

/// Pivot magnitude below which `I - Q` is treated as singular.
pub const PIVOT_EPSILON: f64 = 1e-14;

/// Percentile levels reported by distribution evolution.
pub const PERCENTILE_LEVELS: [(&str, f64); 7] = [
    ("p10", 0.10),
    ("p25", 0.25),
    ("p50", 0.50),
    ("p75", 0.75),
    ("p90", 0.90),
    ("p95", 0.95),
    ("p99", 0.99),
];
