//! Absorbing-chain analysis via the fundamental matrix.
//!
//! With the states reordered as (transient, absorbing) the transition matrix
//! has the canonical form
//!
//! ```text
//! T = | Q  R |
//!     | 0  I |
//! ```
//!
//! `N = (I - Q)^-1` counts expected visits between transient states,
//! `B = N · R` gives absorption probabilities, and `t = N · 1` the expected
//! number of turns before absorption.

use serde::Serialize;
use tracing::info;

use crate::constants::PIVOT_EPSILON;
use crate::error::{PrimerError, Result};

use super::matrix::TransitionMatrix;

#[derive(Debug, Clone, Serialize)]
pub struct AbsorptionAnalysis {
    /// Original state indices of the transient states, ascending.
    pub transient: Vec<usize>,
    /// Original state indices of the absorbing states, ascending.
    pub absorbing: Vec<usize>,
    /// `N[i][j]`: expected visits to `transient[j]` starting from `transient[i]`.
    pub fundamental: Vec<Vec<f64>>,
    /// `B[i][k]`: probability that `transient[i]` is absorbed in `absorbing[k]`.
    pub absorption_probabilities: Vec<Vec<f64>>,
    /// `t[i]`: expected turns before absorption starting from `transient[i]`.
    pub expected_steps: Vec<f64>,
}

impl AbsorptionAnalysis {
    pub fn analyze(matrix: &TransitionMatrix) -> Result<Self> {
        let n = matrix.dim();
        let (absorbing, transient): (Vec<usize>, Vec<usize>) =
            (0..n).partition(|&i| matrix.is_absorbing(i));
        if absorbing.is_empty() {
            return Err(PrimerError::NoAbsorbingStates);
        }

        let q = matrix.submatrix(&transient, &transient);
        let r = matrix.submatrix(&transient, &absorbing);

        let m = transient.len();
        let mut i_minus_q = vec![vec![0.0; m]; m];
        for (i, row) in i_minus_q.iter_mut().enumerate() {
            for (j, slot) in row.iter_mut().enumerate() {
                *slot = (if i == j { 1.0 } else { 0.0 }) - q[i][j];
            }
        }
        let fundamental = invert(i_minus_q)?;

        let absorption_probabilities: Vec<Vec<f64>> = fundamental
            .iter()
            .map(|n_row| {
                (0..absorbing.len())
                    .map(|k| n_row.iter().zip(&r).map(|(a, r_row)| a * r_row[k]).sum())
                    .collect()
            })
            .collect();
        let expected_steps: Vec<f64> = fundamental.iter().map(|row| row.iter().sum()).collect();

        info!(
            transient = m,
            absorbing = absorbing.len(),
            "absorbing chain analysed"
        );

        Ok(Self {
            transient,
            absorbing,
            fundamental,
            absorption_probabilities,
            expected_steps,
        })
    }

    /// Expected turns before absorption from `state`; 0 for an absorbing state.
    pub fn expected_steps_from(&self, state: usize) -> Option<f64> {
        if self.absorbing.binary_search(&state).is_ok() {
            return Some(0.0);
        }
        let i = self.transient.binary_search(&state).ok()?;
        Some(self.expected_steps[i])
    }

    /// Probability that a chain started in `from` is absorbed in `into`.
    pub fn absorption_probability(&self, from: usize, into: usize) -> Option<f64> {
        let k = self.absorbing.binary_search(&into).ok()?;
        if self.absorbing.binary_search(&from).is_ok() {
            return Some(if from == into { 1.0 } else { 0.0 });
        }
        let i = self.transient.binary_search(&from).ok()?;
        Some(self.absorption_probabilities[i][k])
    }
}

/// Gauss-Jordan inversion with partial pivoting.
fn invert(mut a: Vec<Vec<f64>>) -> Result<Vec<Vec<f64>>> {
    let n = a.len();
    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < PIVOT_EPSILON {
            return Err(PrimerError::Singular);
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let scale = 1.0 / a[col][col];
        for j in 0..n {
            a[col][j] *= scale;
            inv[col][j] *= scale;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }
    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverts_small_matrix() {
        let inv = invert(vec![vec![4.0, 7.0], vec![2.0, 6.0]]).unwrap();
        let expected = [[0.6, -0.7], [-0.2, 0.4]];
        for i in 0..2 {
            for j in 0..2 {
                assert!((inv[i][j] - expected[i][j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn gamblers_ruin() {
        // Fair walk on 0..=4 absorbed at both ends.
        let mut rows = vec![vec![0.0; 5]; 5];
        rows[0][0] = 1.0;
        rows[4][4] = 1.0;
        for i in 1..4 {
            rows[i][i - 1] = 0.5;
            rows[i][i + 1] = 0.5;
        }
        let m = TransitionMatrix::from_rows(rows).unwrap();
        let a = AbsorptionAnalysis::analyze(&m).unwrap();
        assert_eq!(a.absorbing, vec![0, 4]);
        assert_eq!(a.transient, vec![1, 2, 3]);
        // Expected duration from i is i * (4 - i).
        assert!((a.expected_steps_from(1).unwrap() - 3.0).abs() < 1e-12);
        assert!((a.expected_steps_from(2).unwrap() - 4.0).abs() < 1e-12);
        assert_eq!(a.expected_steps_from(4), Some(0.0));
        // Ruin probability from i is (4 - i) / 4.
        assert!((a.absorption_probability(1, 0).unwrap() - 0.75).abs() < 1e-12);
        assert!((a.absorption_probability(3, 4).unwrap() - 0.75).abs() < 1e-12);
        assert_eq!(a.absorption_probability(0, 4), Some(0.0));
        assert_eq!(a.absorption_probability(2, 3), None);
    }

    #[test]
    fn trapped_transient_class_is_singular() {
        // States 0 and 1 swap forever and never reach absorbing state 2.
        let m = TransitionMatrix::from_rows(vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        assert!(matches!(
            AbsorptionAnalysis::analyze(&m),
            Err(PrimerError::Singular)
        ));
    }

    #[test]
    fn no_absorbing_states() {
        let m = TransitionMatrix::from_rows(vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
        assert!(matches!(
            AbsorptionAnalysis::analyze(&m),
            Err(PrimerError::NoAbsorbingStates)
        ));
    }
}
