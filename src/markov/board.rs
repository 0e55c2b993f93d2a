//! Board tracks: movement, redirects, and the board-layout projection.
//!
//! A [`Track`] describes how a token moves for each dice total. Its
//! transition matrix is built in two passes, matching how the boards are
//! described on paper:
//!
//! 1. movement: `T[i][advance(i, roll)] += P(roll)`
//! 2. one column redirect per chute, ladder or "go to jail" square, in order
//!
//! [`Track::land`] applies the same rules to a single roll, which is what the
//! Monte Carlo simulation uses. Row `i` of the matrix equals the distribution
//! of `land(i, roll)`.

use serde::{Deserialize, Serialize};

use crate::error::{PrimerError, Result};

use super::matrix::TransitionMatrix;

/// Landing on `from` sends the token to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub from: usize,
    pub to: usize,
}

impl Redirect {
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

impl From<(usize, usize)> for Redirect {
    fn from((from, to): (usize, usize)) -> Self {
        Self { from, to }
    }
}

/// Check redirects against a board with `states` states.
///
/// The start square (0) cannot be a redirect source, a square redirects at
/// most once, and a redirect cannot point at itself.
pub fn validate_redirects(redirects: &[Redirect], states: usize) -> Result<()> {
    let mut seen = vec![false; states];
    for r in redirects {
        for square in [r.from, r.to] {
            if square >= states {
                return Err(PrimerError::SquareOutOfRange { square, states });
            }
        }
        if r.from == 0 || r.from == r.to {
            return Err(PrimerError::InvalidRedirect {
                from: r.from,
                to: r.to,
            });
        }
        if seen[r.from] {
            return Err(PrimerError::DuplicateRedirect(r.from));
        }
        seen[r.from] = true;
    }
    Ok(())
}

/// A board the token walks around, one dice roll per turn.
pub trait Track: Sync {
    /// Number of Markov states, including the start square.
    fn num_states(&self) -> usize;

    /// Probability of each dice total, indexed by total.
    fn roll_pmf(&self) -> &[f64];

    /// Square reached from `square` with dice total `roll`, before redirects.
    fn advance(&self, square: usize, roll: usize) -> usize;

    /// Redirects applied after movement, in order.
    fn redirects(&self) -> &[Redirect];

    /// Square reached from `square` with dice total `roll`, after redirects.
    fn land(&self, square: usize, roll: usize) -> usize {
        let mut pos = self.advance(square, roll);
        for r in self.redirects() {
            if pos == r.from {
                pos = r.to;
            }
        }
        pos
    }

    fn transition_matrix(&self) -> Result<TransitionMatrix> {
        let n = self.num_states();
        validate_redirects(self.redirects(), n)?;

        let mut matrix = TransitionMatrix::zeros(n);
        for square in 0..n {
            for (roll, &p) in self.roll_pmf().iter().enumerate() {
                if p > 0.0 {
                    matrix.add(square, self.advance(square, roll), p);
                }
            }
        }
        for r in self.redirects() {
            matrix.redirect_column(r.from, r.to);
        }
        Ok(matrix)
    }

    /// All mass on the start square.
    fn initial_state(&self) -> Vec<f64> {
        let mut state = vec![0.0; self.num_states()];
        if let Some(start) = state.first_mut() {
            *start = 1.0;
        }
        state
    }
}

/// Grid position `(row, col)` of a 1-based square on a snake-layout board.
///
/// Row 0 holds squares `1..=columns` left to right, row 1 holds the next
/// `columns` squares right to left, and so on.
pub fn square_position(square: usize, columns: usize) -> Option<(usize, usize)> {
    if square == 0 || columns == 0 {
        return None;
    }
    let row = (square - 1) / columns;
    let mut col = (square - 1) % columns;
    if row % 2 == 1 {
        col = columns - 1 - col;
    }
    Some((row, col))
}

/// Project a distribution over squares `0..=n` onto the snake-layout grid.
///
/// The start square (index 0) is off the board and is not shown.
pub fn snake_grid(distribution: &[f64], columns: usize) -> Vec<Vec<f64>> {
    let squares = distribution.len().saturating_sub(1);
    if columns == 0 || squares == 0 {
        return Vec::new();
    }
    let rows = squares.div_ceil(columns);
    let mut grid = vec![vec![0.0; columns]; rows];
    for (square, &p) in distribution.iter().enumerate().skip(1) {
        if let Some((row, col)) = square_position(square, columns) {
            grid[row][col] = p;
        }
    }
    grid
}

/// Square numbers laid out the same way as [`snake_grid`].
pub fn snake_labels(squares: usize, columns: usize) -> Vec<Vec<usize>> {
    if columns == 0 || squares == 0 {
        return Vec::new();
    }
    let mut labels = vec![vec![0; columns]; squares.div_ceil(columns)];
    for square in 1..=squares {
        if let Some((row, col)) = square_position(square, columns) {
            labels[row][col] = square;
        }
    }
    labels
}
