//! Monte Carlo play of a board track.
//!
//! Each game rolls real dice with its own `SmallRng` seeded from
//! `seed + game_index`, so a batch is reproducible regardless of how rayon
//! splits it. The turn counts give an independent check on the exact results
//! from [`crate::markov::evolution`] and [`crate::markov::absorbing`].

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::error::{PrimerError, Result};
use crate::markov::board::Track;

/// Results of a batch simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// Turns taken by each finished game, sorted ascending.
    pub turns: Vec<u32>,
    /// Games still running after `max_turns`.
    pub unfinished: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: u32,
    pub max: u32,
    pub median: u32,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Sample a dice total from `pmf` (indexed by total).
#[inline]
fn roll(pmf: &[f64], rng: &mut SmallRng) -> usize {
    let u: f64 = rng.random();
    let mut cumulative = 0.0;
    let mut last = 0;
    for (total, &p) in pmf.iter().enumerate() {
        if p == 0.0 {
            continue;
        }
        cumulative += p;
        last = total;
        if u < cumulative {
            return total;
        }
    }
    last
}

/// Play one game from square 0. Returns the turn on which `target` was
/// reached, or `None` if it was not reached within `max_turns`.
pub fn simulate_game<T: Track + ?Sized>(
    track: &T,
    target: usize,
    max_turns: u32,
    rng: &mut SmallRng,
) -> Option<u32> {
    let pmf = track.roll_pmf();
    let mut square = 0;
    if square == target {
        return Some(0);
    }
    for turn in 1..=max_turns {
        square = track.land(square, roll(pmf, rng));
        if square == target {
            return Some(turn);
        }
    }
    None
}

/// Simulate `num_games` games in parallel, returning aggregate statistics.
pub fn simulate_games<T: Track + ?Sized>(
    track: &T,
    target: usize,
    num_games: usize,
    seed: u64,
    max_turns: u32,
) -> Result<SimulationResult> {
    if target >= track.num_states() {
        return Err(PrimerError::SquareOutOfRange {
            square: target,
            states: track.num_states(),
        });
    }
    let start = Instant::now();

    let outcomes: Vec<Option<u32>> = (0..num_games)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            simulate_game(track, target, max_turns, &mut rng)
        })
        .collect();

    let mut turns: Vec<u32> = outcomes.iter().flatten().copied().collect();
    let unfinished = num_games - turns.len();
    turns.sort_unstable();

    let finished = turns.len();
    let (mean, std_dev) = if finished > 0 {
        let mean = turns.iter().map(|&t| t as f64).sum::<f64>() / finished as f64;
        let variance = turns
            .iter()
            .map(|&t| (t as f64 - mean).powi(2))
            .sum::<f64>()
            / finished as f64;
        (mean, variance.sqrt())
    } else {
        (0.0, 0.0)
    };
    let min = turns.first().copied().unwrap_or(0);
    let max = turns.last().copied().unwrap_or(0);
    let median = turns.get(finished / 2).copied().unwrap_or(0);
    let elapsed = start.elapsed();

    info!(
        games = num_games,
        unfinished,
        mean,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "simulation finished"
    );

    Ok(SimulationResult {
        turns,
        unfinished,
        mean,
        std_dev,
        min,
        max,
        median,
        elapsed,
    })
}
