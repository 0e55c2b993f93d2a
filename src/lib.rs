//! # Primers: dynamic programming and Markov chains on small games
//!
//! Four self-contained exercises, each with an exact solver and a binary
//! that prints (and optionally exports) its result.
//!
//! | Topic | Rust module | Technique |
//! |-------|-------------|-----------|
//! | Egg drop | [`egg_drop`] | Bottom-up minimax table over (eggs, floors) |
//! | 0/1 knapsack | [`knapsack`] | Top-down memoisation over (items remaining, capacity) |
//! | Chutes and Ladders | [`markov::chutes`] | Absorbing chain: evolution + fundamental matrix |
//! | Monopoly | [`markov::monopoly`] | Ergodic chain: stationary distribution |
//!
//! The board games share one Markov toolkit ([`markov`]): a [`markov::board::Track`]
//! describes movement and redirects, its transition matrix is evolved exactly
//! ([`markov::evolution`]) or analysed in closed form ([`markov::absorbing`]),
//! and [`simulation`] plays the same track with real dice as a cross-check.
//!
//! ## State representation
//!
//! - Egg drop: cell `(e, f)` stored row-major at `(e - 1) * (floors + 1) + f`.
//! - Knapsack: `(items_remaining, capacity_remaining)`, memoised in a `HashMap`.
//! - Boards: square indices; 0 is the start square, chutes boards add the
//!   finish as the last state.
//!
//! All probabilities are `f64`.

#![allow(clippy::needless_range_loop)]

pub mod constants;
pub mod egg_drop;
pub mod env_config;
pub mod error;
pub mod knapsack;
pub mod markov;
pub mod simulation;
pub mod storage;

pub use error::{PrimerError, Result};
