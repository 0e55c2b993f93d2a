//! Exact distribution evolution: push a state distribution forward turn by turn.
//!
//! Instead of sampling games, the full distribution over squares is advanced
//! one matrix step per turn. The mass that newly arrives at an absorbing
//! target on turn `k` is exactly `P(game ends on turn k)`, which gives an
//! exact finish-turn PMF up to the chosen horizon.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::constants::PERCENTILE_LEVELS;
use crate::error::{PrimerError, Result};

use super::matrix::{Distribution, TransitionMatrix};

/// Finish-turn distribution and summary statistics from [`evolve`].
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionResult {
    /// `finish_pmf[k]` = P(target first reached on turn k); index 0 is the start.
    pub finish_pmf: Vec<f64>,
    /// Total mass that reached the target within the horizon.
    pub finished: f64,
    /// Truncated mean `Σ k · finish_pmf[k]`.
    pub mean: f64,
    /// Truncated variance around `mean`, normalised by `finished`.
    pub variance: f64,
    pub std_dev: f64,
    /// First turn whose cumulative finish mass reaches each level; levels never
    /// reached within the horizon are omitted.
    pub percentiles: BTreeMap<String, usize>,
    /// Distribution after the last turn.
    pub final_distribution: Distribution,
    /// Distribution after every turn `0..=turns`, when requested.
    pub frames: Option<Vec<Distribution>>,
}

impl EvolutionResult {
    pub fn percentile(&self, name: &str) -> Option<usize> {
        self.percentiles.get(name).copied()
    }
}

fn check_state(matrix: &TransitionMatrix, state: usize) -> Result<()> {
    if state >= matrix.dim() {
        return Err(PrimerError::SquareOutOfRange {
            square: state,
            states: matrix.dim(),
        });
    }
    Ok(())
}

/// Distribution after `turns` turns: `initial · T^turns`.
pub fn distribution_after(
    matrix: &TransitionMatrix,
    initial: &[f64],
    turns: usize,
) -> Result<Distribution> {
    matrix.pow(turns).step(initial)
}

/// Distributions after every turn `0..=turns`, starting from `initial`.
pub fn trajectory(
    matrix: &TransitionMatrix,
    initial: &[f64],
    turns: usize,
) -> Result<Vec<Distribution>> {
    let mut frames = Vec::with_capacity(turns + 1);
    let mut state = initial.to_vec();
    for _ in 0..turns {
        let next = matrix.step(&state)?;
        frames.push(state);
        state = next;
    }
    frames.push(state);
    Ok(frames)
}

/// Advance `initial` for `turns` turns, tracking arrivals at `target`.
///
/// `target` is expected to be absorbing; the arrival on turn `k` is the
/// growth of its mass between turns `k - 1` and `k`.
pub fn evolve(
    matrix: &TransitionMatrix,
    initial: &[f64],
    target: usize,
    turns: usize,
    keep_frames: bool,
) -> Result<EvolutionResult> {
    check_state(matrix, target)?;
    let t_total = Instant::now();

    let mut state = initial.to_vec();
    let mut frames = keep_frames.then(|| vec![state.clone()]);
    let mut finish_pmf = Vec::with_capacity(turns + 1);
    finish_pmf.push(0.0);
    let mut previous_done = initial.get(target).copied().unwrap_or(0.0);

    for turn in 1..=turns {
        state = matrix.step(&state)?;
        let done = state[target];
        finish_pmf.push((done - previous_done).max(0.0));
        previous_done = done;
        if let Some(frames) = frames.as_mut() {
            frames.push(state.clone());
        }
        if turn % 100 == 0 {
            debug!(turn, finished = done, "evolution progress");
        }
    }

    let finished: f64 = finish_pmf.iter().sum();
    let mean: f64 = finish_pmf
        .iter()
        .enumerate()
        .map(|(k, &p)| k as f64 * p)
        .sum();
    let variance = if finished > 0.0 {
        let conditional_mean = mean / finished;
        finish_pmf
            .iter()
            .enumerate()
            .map(|(k, &p)| p * (k as f64 - conditional_mean).powi(2))
            .sum::<f64>()
            / finished
    } else {
        0.0
    };

    let mut percentiles = BTreeMap::new();
    let mut cumulative = 0.0;
    let mut levels = PERCENTILE_LEVELS.iter().peekable();
    for (k, &p) in finish_pmf.iter().enumerate() {
        cumulative += p;
        while let Some(&&(name, level)) = levels.peek() {
            if cumulative + 1e-12 < level {
                break;
            }
            percentiles.insert(name.to_string(), k);
            levels.next();
        }
    }

    info!(
        turns,
        finished,
        mean,
        elapsed_ms = t_total.elapsed().as_secs_f64() * 1000.0,
        "distribution evolved"
    );

    Ok(EvolutionResult {
        finish_pmf,
        finished,
        mean,
        variance,
        std_dev: variance.sqrt(),
        percentiles,
        final_distribution: state,
        frames,
    })
}

/// Truncated expected number of turns to reach `target` from square 0.
///
/// Sums `k · (P_done[k] - P_done[k - 1])` over `k = 1..=iterations`.
pub fn average_turns(matrix: &TransitionMatrix, target: usize, iterations: usize) -> Result<f64> {
    check_state(matrix, target)?;
    let mut initial = vec![0.0; matrix.dim()];
    initial[0] = 1.0;
    Ok(evolve(matrix, &initial, target, iterations, false)?.mean)
}

/// Long-run distribution by power iteration from `initial`.
///
/// Stops once the L1 change between consecutive turns drops below
/// `tolerance`. Returns the distribution and the number of turns taken.
pub fn stationary_distribution(
    matrix: &TransitionMatrix,
    initial: &[f64],
    tolerance: f64,
    max_iterations: usize,
) -> Result<(Distribution, usize)> {
    let mut state = initial.to_vec();
    let mut delta = f64::INFINITY;
    for iteration in 1..=max_iterations {
        let next = matrix.step(&state)?;
        delta = next
            .iter()
            .zip(&state)
            .map(|(a, b)| (a - b).abs())
            .sum();
        state = next;
        if delta < tolerance {
            debug!(iteration, delta, "stationary distribution converged");
            return Ok((state, iteration));
        }
    }
    Err(PrimerError::NotConverged {
        iterations: max_iterations,
        delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Leave state 0 with probability 1/2 per turn: geometric finish time.
    fn coin_chain() -> TransitionMatrix {
        TransitionMatrix::from_rows(vec![vec![0.5, 0.5], vec![0.0, 1.0]]).unwrap()
    }

    #[test]
    fn geometric_finish_pmf() {
        let result = evolve(&coin_chain(), &[1.0, 0.0], 1, 60, false).unwrap();
        assert_eq!(result.finish_pmf[0], 0.0);
        assert!((result.finish_pmf[1] - 0.5).abs() < 1e-15);
        assert!((result.finish_pmf[3] - 0.125).abs() < 1e-15);
        assert!((result.mean - 2.0).abs() < 1e-9);
        assert!((result.variance - 2.0).abs() < 1e-9);
        assert_eq!(result.percentile("p50"), Some(1));
        assert_eq!(result.percentile("p75"), Some(2));
        assert!(result.frames.is_none());
    }

    #[test]
    fn frames_are_kept_on_request() {
        let result = evolve(&coin_chain(), &[1.0, 0.0], 1, 3, true).unwrap();
        let frames = result.frames.unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], vec![1.0, 0.0]);
        assert_eq!(frames[2], vec![0.25, 0.75]);
    }

    #[test]
    fn short_horizon_omits_unreached_percentiles() {
        let result = evolve(&coin_chain(), &[1.0, 0.0], 1, 2, false).unwrap();
        assert!((result.finished - 0.75).abs() < 1e-15);
        assert_eq!(result.percentile("p75"), Some(2));
        assert_eq!(result.percentile("p90"), None);
    }

    #[test]
    fn distribution_after_matches_stepping() {
        let m = coin_chain();
        let d = distribution_after(&m, &[1.0, 0.0], 4).unwrap();
        assert!((d[0] - 1.0 / 16.0).abs() < 1e-15);
        assert!(average_turns(&m, 5, 10).is_err());
    }

    #[test]
    fn stationary_of_two_state_cycle_mix() {
        let m = TransitionMatrix::from_rows(vec![vec![0.9, 0.1], vec![0.5, 0.5]]).unwrap();
        let (pi, iterations) = stationary_distribution(&m, &[1.0, 0.0], 1e-13, 10_000).unwrap();
        assert!(iterations > 1);
        assert!((pi[0] - 5.0 / 6.0).abs() < 1e-10);
        assert!((pi[1] - 1.0 / 6.0).abs() < 1e-10);
    }

    #[test]
    fn periodic_chain_does_not_converge() {
        let flip = TransitionMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        assert!(matches!(
            stationary_distribution(&flip, &[1.0, 0.0], 1e-9, 50),
            Err(PrimerError::NotConverged { iterations: 50, .. })
        ));
    }

    #[test]
    fn trajectory_keeps_every_turn() {
        let m = coin_chain();
        let frames = trajectory(&m, &[1.0, 0.0], 3).unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], vec![1.0, 0.0]);
        assert_eq!(frames[3], vec![0.125, 0.875]);
        assert!(trajectory(&m, &[1.0], 2).is_err());
        assert_eq!(trajectory(&m, &[0.0, 1.0], 0).unwrap(), vec![vec![0.0, 1.0]]);
    }
}
