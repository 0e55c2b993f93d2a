//! Chutes and Ladders as an absorbing Markov chain.
//!
//! States are squares `0..=squares`: 0 is the off-board start and `squares`
//! is the finish. One die is rolled per turn. A roll that would carry the
//! token past the finish leaves it where it is.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CHUTES, CHUTES_BOARD_SQUARES, CHUTES_DIE_FACES, DEATH_BOARD_SQUARES, DEATH_CHUTE_SQUARE,
    LADDERS,
};
use crate::error::PrimerError;

use super::board::{validate_redirects, Redirect, Track};
use super::dice::dice_sum_pmf;

/// How the last square can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishRule {
    /// Landing exactly on the last square finishes the game.
    Exact,
    /// The last square is only reachable through a redirect; a roll that
    /// would land on it leaves the token in place.
    PortalOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawChutesBoard")]
pub struct ChutesBoard {
    squares: usize,
    finish: FinishRule,
    /// Chutes first, then ladders.
    redirects: Vec<Redirect>,
    chute_count: usize,
    roll_pmf: Vec<f64>,
}

/// Unchecked serialized form of [`ChutesBoard`].
#[derive(Deserialize)]
struct RawChutesBoard {
    squares: usize,
    finish: FinishRule,
    redirects: Vec<Redirect>,
    chute_count: usize,
    roll_pmf: Vec<f64>,
}

impl TryFrom<RawChutesBoard> for ChutesBoard {
    type Error = PrimerError;

    fn try_from(raw: RawChutesBoard) -> Result<Self, Self::Error> {
        if raw.chute_count > raw.redirects.len() {
            return Err(PrimerError::ChuteCountOutOfRange {
                chutes: raw.chute_count,
                redirects: raw.redirects.len(),
            });
        }
        validate_redirects(&raw.redirects, raw.squares.saturating_add(1))?;
        Ok(Self {
            squares: raw.squares,
            finish: raw.finish,
            redirects: raw.redirects,
            chute_count: raw.chute_count,
            roll_pmf: raw.roll_pmf,
        })
    }
}

impl ChutesBoard {
    /// Plain track of `squares` squares with one d6 and no redirects.
    pub fn new(squares: usize) -> Self {
        Self::with_die(squares, CHUTES_DIE_FACES)
    }

    pub fn with_die(squares: usize, faces: usize) -> Self {
        Self {
            squares,
            finish: FinishRule::Exact,
            redirects: Vec::new(),
            chute_count: 0,
            roll_pmf: dice_sum_pmf(1, faces),
        }
    }

    /// The standard 100-square board.
    pub fn classic() -> Self {
        Self::new(CHUTES_BOARD_SQUARES)
            .with_chutes(CHUTES)
            .with_ladders(LADDERS)
    }

    /// Board whose last square is reachable only through a chute from square 6.
    pub fn death_square(squares: usize) -> Self {
        Self::new(squares)
            .with_finish_rule(FinishRule::PortalOnly)
            .with_chutes([(DEATH_CHUTE_SQUARE, squares)])
    }

    /// The 10-square toy version of [`ChutesBoard::death_square`].
    pub fn death_square_default() -> Self {
        Self::death_square(DEATH_BOARD_SQUARES)
    }

    pub fn with_finish_rule(mut self, finish: FinishRule) -> Self {
        self.finish = finish;
        self
    }

    /// Append chutes; they are applied before every ladder.
    pub fn with_chutes<I, R>(mut self, chutes: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Redirect>,
    {
        for chute in chutes {
            self.redirects.insert(self.chute_count, chute.into());
            self.chute_count += 1;
        }
        self
    }

    pub fn with_ladders<I, R>(mut self, ladders: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Redirect>,
    {
        self.redirects.extend(ladders.into_iter().map(Into::into));
        self
    }

    pub fn squares(&self) -> usize {
        self.squares
    }

    /// The finish square, which is also the last state index.
    pub fn finish_square(&self) -> usize {
        self.squares
    }

    pub fn finish_rule(&self) -> FinishRule {
        self.finish
    }

    pub fn chutes(&self) -> &[Redirect] {
        &self.redirects[..self.chute_count]
    }

    pub fn ladders(&self) -> &[Redirect] {
        &self.redirects[self.chute_count..]
    }
}

impl Track for ChutesBoard {
    fn num_states(&self) -> usize {
        self.squares + 1
    }

    fn roll_pmf(&self) -> &[f64] {
        &self.roll_pmf
    }

    fn advance(&self, square: usize, roll: usize) -> usize {
        let target = square + roll;
        let blocked = match self.finish {
            FinishRule::Exact => target > self.squares,
            FinishRule::PortalOnly => target >= self.squares,
        };
        if blocked {
            square
        } else {
            target
        }
    }

    fn redirects(&self) -> &[Redirect] {
        &self.redirects
    }
}
