//! Monte Carlo play of board tracks.
//!
//! - [`engine`]: play N games in parallel and summarise the turn counts

pub mod engine;

pub use engine::{simulate_game, simulate_games, SimulationResult};
