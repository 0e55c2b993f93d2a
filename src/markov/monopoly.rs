//! Monopoly as a dice walk on a circular board.
//!
//! Two dice are rolled each turn and the token moves forward, wrapping past
//! GO. Without redirects every column sums to one as well as every row, so
//! the long-run distribution is uniform; the Go-To-Jail square is what makes
//! it interesting.

use serde::{Deserialize, Serialize};

use crate::constants::{
    GO_TO_JAIL_SQUARE, JAIL_SQUARE, MONOPOLY_DICE, MONOPOLY_DIE_FACES, MONOPOLY_SQUARES,
};

use super::board::{Redirect, Track};
use super::dice::dice_sum_pmf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonopolyBoard {
    squares: usize,
    redirects: Vec<Redirect>,
    roll_pmf: Vec<f64>,
}

impl MonopolyBoard {
    pub fn new(squares: usize) -> Self {
        Self {
            squares,
            redirects: Vec::new(),
            roll_pmf: dice_sum_pmf(MONOPOLY_DICE, MONOPOLY_DIE_FACES),
        }
    }

    /// 40 squares, two d6, no redirects.
    pub fn classic() -> Self {
        Self::new(MONOPOLY_SQUARES)
    }

    /// Landing on square 30 sends the token to jail (square 10).
    pub fn with_go_to_jail(self) -> Self {
        self.with_redirect(Redirect::new(GO_TO_JAIL_SQUARE, JAIL_SQUARE))
    }

    pub fn with_redirect(mut self, redirect: Redirect) -> Self {
        self.redirects.push(redirect);
        self
    }

    pub fn squares(&self) -> usize {
        self.squares
    }
}

impl Track for MonopolyBoard {
    fn num_states(&self) -> usize {
        self.squares
    }

    fn roll_pmf(&self) -> &[f64] {
        &self.roll_pmf
    }

    fn advance(&self, square: usize, roll: usize) -> usize {
        if self.squares == 0 {
            return 0;
        }
        (square + roll) % self.squares
    }

    fn redirects(&self) -> &[Redirect] {
        &self.redirects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STOCHASTIC_TOLERANCE;

    #[test]
    fn classic_matrix_is_doubly_stochastic() {
        let m = MonopolyBoard::classic().transition_matrix().unwrap();
        assert_eq!(m.dim(), 40);
        m.validate_stochastic(STOCHASTIC_TOLERANCE).unwrap();
        for j in 0..40 {
            let col: f64 = (0..40).map(|i| m.get(i, j)).sum();
            assert!((col - 1.0).abs() < 1e-12, "column {j} sums to {col}");
        }
        // Seven is the most likely total.
        assert!((m.get(0, 7) - 6.0 / 36.0).abs() < 1e-15);
        // 38 + 12 wraps to 10.
        assert!((m.get(38, 10) - 1.0 / 36.0).abs() < 1e-15);
    }

    #[test]
    fn go_to_jail_empties_square_thirty() {
        let m = MonopolyBoard::classic()
            .with_go_to_jail()
            .transition_matrix()
            .unwrap();
        m.validate_stochastic(STOCHASTIC_TOLERANCE).unwrap();
        for i in 0..40 {
            assert_eq!(m.get(i, GO_TO_JAIL_SQUARE), 0.0);
        }
        assert!((m.get(23, JAIL_SQUARE) - 6.0 / 36.0).abs() < 1e-15);
    }
}
