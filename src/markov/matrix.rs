//! Dense row-major transition matrix.
//!
//! Entry `(i, j)` is the probability of moving from state `i` to state `j` in
//! one turn. Distributions are row vectors, so one turn is `d' = d · T`.

use rayon::prelude::*;
use serde::Serialize;

use crate::constants::ABSORBING_EPSILON;
use crate::error::{PrimerError, Result};

/// Probability mass over states, indexed by state.
pub type Distribution = Vec<f64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionMatrix {
    n: usize,
    data: Vec<f64>,
}

impl TransitionMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Build from nested rows; every row must have as many entries as there are rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(PrimerError::NotSquare {
                    rows: n,
                    cols: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    #[inline]
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] += value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.n.max(1)).map(<[f64]>::to_vec).collect()
    }

    /// Send everything that would arrive at `from` to `to` instead.
    ///
    /// Column `to` absorbs column `from`, which is left empty.
    pub fn redirect_column(&mut self, from: usize, to: usize) {
        let n = self.n;
        for i in 0..n {
            let moved = self.data[i * n + from];
            self.data[i * n + from] = 0.0;
            self.data[i * n + to] += moved;
        }
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.data
            .chunks(self.n.max(1))
            .map(|row| row.iter().sum())
            .collect()
    }

    /// Every row must sum to 1 within `tolerance`.
    pub fn validate_stochastic(&self, tolerance: f64) -> Result<()> {
        for (row, sum) in self.row_sums().into_iter().enumerate() {
            if (sum - 1.0).abs() > tolerance {
                return Err(PrimerError::NotStochastic { row, sum });
            }
        }
        Ok(())
    }

    pub fn is_absorbing(&self, state: usize) -> bool {
        self.get(state, state) >= 1.0 - ABSORBING_EPSILON
    }

    /// Matrix product `self · other`.
    pub fn multiply(&self, other: &TransitionMatrix) -> Result<TransitionMatrix> {
        if self.n != other.n {
            return Err(PrimerError::DimensionMismatch {
                left: self.n,
                right: other.n,
            });
        }
        Ok(self.product(other))
    }

    /// Output rows are independent and computed in parallel. Dimensions must match.
    fn product(&self, other: &TransitionMatrix) -> TransitionMatrix {
        let n = self.n;
        let mut out = vec![0.0; n * n];
        if n == 0 {
            return Self { n, data: out };
        }
        out.par_chunks_mut(n).enumerate().for_each(|(i, out_row)| {
            let lhs = &self.data[i * n..(i + 1) * n];
            for (k, &a) in lhs.iter().enumerate() {
                if a == 0.0 {
                    continue;
                }
                let rhs = &other.data[k * n..(k + 1) * n];
                for (o, &b) in out_row.iter_mut().zip(rhs) {
                    *o += a * b;
                }
            }
        });
        Self { n, data: out }
    }

    /// `self^k` by repeated squaring.
    pub fn pow(&self, mut k: usize) -> TransitionMatrix {
        let mut result = Self::identity(self.n);
        let mut base = self.clone();
        while k > 0 {
            if k & 1 == 1 {
                result = result.product(&base);
            }
            k >>= 1;
            if k > 0 {
                base = base.product(&base);
            }
        }
        result
    }

    /// One turn: row vector `distribution` times this matrix.
    pub fn step(&self, distribution: &[f64]) -> Result<Distribution> {
        if distribution.len() != self.n {
            return Err(PrimerError::DimensionMismatch {
                left: distribution.len(),
                right: self.n,
            });
        }
        let n = self.n;
        let mut next = vec![0.0; n];
        for (i, &p) in distribution.iter().enumerate() {
            if p == 0.0 {
                continue;
            }
            for (slot, &t) in next.iter_mut().zip(&self.data[i * n..(i + 1) * n]) {
                *slot += p * t;
            }
        }
        Ok(next)
    }

    /// Rectangular slice `[rows] x [cols]`, returned row-major.
    pub fn submatrix(&self, rows: &[usize], cols: &[usize]) -> Vec<Vec<f64>> {
        rows.iter()
            .map(|&i| cols.iter().map(|&j| self.get(i, j)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state() -> TransitionMatrix {
        TransitionMatrix::from_rows(vec![vec![0.5, 0.5], vec![0.0, 1.0]]).unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = TransitionMatrix::from_rows(vec![vec![1.0, 0.0], vec![1.0]]);
        assert!(matches!(err, Err(PrimerError::NotSquare { rows: 2, cols: 1 })));
    }

    #[test]
    fn pow_matches_repeated_multiply() {
        let m = two_state();
        let p5 = m.pow(5);
        let mut manual = TransitionMatrix::identity(2);
        for _ in 0..5 {
            manual = manual.multiply(&m).unwrap();
        }
        for i in 0..2 {
            for j in 0..2 {
                assert!((p5.get(i, j) - manual.get(i, j)).abs() < 1e-15);
            }
        }
        assert!((p5.get(0, 0) - 0.5f64.powi(5)).abs() < 1e-15);
        assert_eq!(m.pow(0), TransitionMatrix::identity(2));
    }

    #[test]
    fn step_moves_mass() {
        let m = two_state();
        let d = m.step(&[1.0, 0.0]).unwrap();
        assert_eq!(d, vec![0.5, 0.5]);
        assert!(m.step(&[1.0]).is_err());
    }

    #[test]
    fn redirect_column_preserves_row_sums() {
        let mut m = TransitionMatrix::from_rows(vec![
            vec![0.0, 0.5, 0.5],
            vec![0.0, 0.5, 0.5],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        m.redirect_column(1, 0);
        assert_eq!(m.row(0), &[0.5, 0.0, 0.5]);
        assert_eq!(m.row(1), &[0.5, 0.0, 0.5]);
        m.validate_stochastic(1e-12).unwrap();
    }

    #[test]
    fn validate_stochastic_reports_row() {
        let m = TransitionMatrix::from_rows(vec![vec![0.5, 0.0], vec![0.0, 1.0]]).unwrap();
        assert!(matches!(
            m.validate_stochastic(1e-9),
            Err(PrimerError::NotStochastic { row: 0, .. })
        ));
    }

    #[test]
    fn absorbing_and_submatrix() {
        let m = two_state();
        assert!(!m.is_absorbing(0));
        assert!(m.is_absorbing(1));
        assert_eq!(m.submatrix(&[0], &[1]), vec![vec![0.5]]);
    }
}
