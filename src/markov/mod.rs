//! Board games as Markov chains.
//!
//! Each board is a [`board::Track`]: a movement rule per dice total plus an
//! ordered list of redirects (chutes, ladders, Go To Jail). From a track we
//! build a dense [`matrix::TransitionMatrix`] and analyse it in two ways:
//!
//! | Question | Module |
//! |----------|--------|
//! | Where is the token after `k` turns? When does the game end? | [`evolution`] |
//! | Expected turns and absorption probabilities, exactly | [`absorbing`] |
//! | Long-run occupancy of a circular board | [`evolution::stationary_distribution`] |

pub mod absorbing;
pub mod board;
pub mod chutes;
pub mod dice;
pub mod evolution;
pub mod matrix;
pub mod monopoly;
