//! End-to-end checks on the board chains: exact evolution, the fundamental
//! matrix and Monte Carlo play must tell the same story.

use primers::constants::{BOARD_COLUMNS, GO_TO_JAIL_SQUARE, JAIL_SQUARE, STOCHASTIC_TOLERANCE};
use primers::markov::absorbing::AbsorptionAnalysis;
use primers::markov::board::{snake_grid, Track};
use primers::markov::chutes::ChutesBoard;
use primers::markov::evolution::{
    average_turns, distribution_after, evolve, stationary_distribution, trajectory,
};
use primers::markov::monopoly::MonopolyBoard;
use primers::simulation::simulate_games;

#[test]
fn one_square_board_takes_six_turns() {
    let board = ChutesBoard::new(1);
    let m = board.transition_matrix().unwrap();
    let analysis = AbsorptionAnalysis::analyze(&m).unwrap();
    assert!((analysis.expected_steps_from(0).unwrap() - 6.0).abs() < 1e-9);
    assert!((average_turns(&m, 1, 2_000).unwrap() - 6.0).abs() < 1e-9);
}

#[test]
fn two_square_board_takes_six_turns() {
    // From 0: roll 1 -> 1, roll 2 -> finish, else stay. From 1: only a 1 finishes.
    let board = ChutesBoard::new(2);
    let m = board.transition_matrix().unwrap();
    let analysis = AbsorptionAnalysis::analyze(&m).unwrap();
    assert!((analysis.expected_steps_from(1).unwrap() - 6.0).abs() < 1e-9);
    assert!((analysis.expected_steps_from(0).unwrap() - 6.0).abs() < 1e-9);
}

#[test]
fn classic_fundamental_matrix_matches_long_evolution() {
    let board = ChutesBoard::classic();
    let m = board.transition_matrix().unwrap();
    let analysis = AbsorptionAnalysis::analyze(&m).unwrap();
    assert_eq!(analysis.absorbing, vec![100]);
    let exact = analysis.expected_steps_from(0).unwrap();

    let evolution = evolve(&m, &board.initial_state(), 100, 2_000, false).unwrap();
    assert!((evolution.finished - 1.0).abs() < 1e-9);
    assert!(
        (evolution.mean - exact).abs() < 1e-6,
        "evolved {} vs fundamental {exact}",
        evolution.mean
    );
    // The shortest game uses the 1 -> 38 and 80 -> 100 ladders among others.
    let first = evolution
        .finish_pmf
        .iter()
        .position(|&p| p > 0.0)
        .unwrap();
    assert!(first >= 1 && first < 10, "first finish turn {first}");
    assert!(evolution.percentile("p50").unwrap() < evolution.percentile("p90").unwrap());
}

#[test]
fn death_board_absorption_probabilities_sum_to_one() {
    let board = ChutesBoard::death_square_default();
    let m = board.transition_matrix().unwrap();
    let analysis = AbsorptionAnalysis::analyze(&m).unwrap();
    assert_eq!(analysis.absorbing, vec![9, 10]);
    for row in &analysis.absorption_probabilities {
        let total: f64 = row.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "row sums to {total}");
    }
    let finish = analysis.absorption_probability(0, 10).unwrap();
    let stuck = analysis.absorption_probability(0, 9).unwrap();
    assert!(finish > 0.0 && stuck > 0.0);
    assert!((finish + stuck - 1.0).abs() < 1e-9);
}

#[test]
fn monopoly_without_jail_is_uniform() {
    let board = MonopolyBoard::classic();
    let m = board.transition_matrix().unwrap();
    let (pi, _) = stationary_distribution(&m, &board.initial_state(), 1e-13, 20_000).unwrap();
    for (square, &p) in pi.iter().enumerate() {
        assert!((p - 1.0 / 40.0).abs() < 1e-9, "square {square}: {p}");
    }
}

#[test]
fn monopoly_jail_square_collects_go_to_jail_mass() {
    let board = MonopolyBoard::classic().with_go_to_jail();
    let m = board.transition_matrix().unwrap();
    m.validate_stochastic(STOCHASTIC_TOLERANCE).unwrap();
    let (pi, _) = stationary_distribution(&m, &board.initial_state(), 1e-13, 20_000).unwrap();
    assert_eq!(pi[GO_TO_JAIL_SQUARE], 0.0);
    assert!((pi.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    let (most, _) = pi
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .unwrap();
    assert_eq!(most, JAIL_SQUARE);
}

#[test]
fn monte_carlo_agrees_with_exact_expectation() {
    let board = ChutesBoard::classic();
    let m = board.transition_matrix().unwrap();
    let exact = AbsorptionAnalysis::analyze(&m)
        .unwrap()
        .expected_steps_from(0)
        .unwrap();

    let result = simulate_games(&board, 100, 20_000, 42, 100_000).unwrap();
    assert_eq!(result.unfinished, 0);
    assert_eq!(result.turns.len(), 20_000);
    assert!(
        (result.mean - exact).abs() < 1.5,
        "simulated {} vs exact {exact}",
        result.mean
    );
    assert!(result.min >= 1 && result.min <= result.median);
}

#[test]
fn snake_grid_shows_everything_but_the_start() {
    let board = ChutesBoard::classic();
    let m = board.transition_matrix().unwrap();
    let evolution = evolve(&m, &board.initial_state(), 100, 5, true).unwrap();
    let frames = evolution.frames.as_ref().unwrap();
    assert_eq!(frames.len(), 6);
    let last = &evolution.final_distribution;
    assert_eq!(frames[5], *last);

    let grid = snake_grid(last, BOARD_COLUMNS);
    assert_eq!(grid.len(), 10);
    let shown: f64 = grid.iter().flatten().sum();
    assert!((shown + last[0] - 1.0).abs() < 1e-12);
}

#[test]
fn monopoly_trajectory_matches_matrix_power() {
    let board = MonopolyBoard::classic().with_go_to_jail();
    let m = board.transition_matrix().unwrap();
    let frames = trajectory(&m, &board.initial_state(), 500).unwrap();
    assert_eq!(frames.len(), 501);
    for k in [1, 7, 500] {
        let direct = distribution_after(&m, &board.initial_state(), k).unwrap();
        for (a, b) in frames[k].iter().zip(&direct) {
            assert!((a - b).abs() < 1e-12, "turn {k}: {a} vs {b}");
        }
    }
    for frame in &frames {
        assert!((frame.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
