//! Chutes and Ladders as a Markov chain.
//!
//! Evolves the start distribution turn by turn, prints the finish-turn
//! statistics and the board heat map, solves the absorbing chain exactly and
//! optionally checks everything against a Monte Carlo run.

use std::time::Instant;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use primers::constants::{BOARD_COLUMNS, DEATH_BOARD_SQUARES, STOCHASTIC_TOLERANCE};
use primers::env_config::{init_base_path, init_logging, init_rayon_threads};
use primers::markov::absorbing::AbsorptionAnalysis;
use primers::markov::board::{snake_grid, snake_labels, Track};
use primers::markov::chutes::ChutesBoard;
use primers::markov::evolution::{evolve, EvolutionResult};
use primers::simulation::{simulate_games, SimulationResult};
use primers::storage::write_json;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BoardKind {
    /// The standard 100-square board
    Classic,
    /// Finish reachable only through the chute on square 6
    Death,
    /// No chutes or ladders
    Plain,
}

#[derive(Parser, Debug)]
#[command(name = "primers-chutes", about = "Chutes and Ladders Markov chain")]
struct Args {
    #[arg(long, value_enum, default_value_t = BoardKind::Classic)]
    board: BoardKind,

    /// Board size for the death and plain boards
    #[arg(long)]
    squares: Option<usize>,

    /// Turns to evolve the distribution
    #[arg(long, default_value_t = 100)]
    turns: usize,

    /// Also play N games with real dice
    #[arg(long)]
    simulate: Option<usize>,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Keep the distribution after every turn in the report
    #[arg(long)]
    frames: bool,

    /// Write a JSON report to this path
    #[arg(long)]
    output: Option<String>,
}

#[derive(Serialize)]
struct Report {
    squares: usize,
    chutes: usize,
    ladders: usize,
    evolution: EvolutionResult,
    expected_turns: Option<f64>,
    absorption: Option<AbsorptionAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    simulation: Option<SimulationResult>,
}

fn build_board(args: &Args) -> ChutesBoard {
    match args.board {
        BoardKind::Classic => ChutesBoard::classic(),
        BoardKind::Death => ChutesBoard::death_square(args.squares.unwrap_or(DEATH_BOARD_SQUARES)),
        BoardKind::Plain => ChutesBoard::new(args.squares.unwrap_or(DEATH_BOARD_SQUARES)),
    }
}

fn print_grid(board: &ChutesBoard, distribution: &[f64]) {
    let grid = snake_grid(distribution, BOARD_COLUMNS);
    let labels = snake_labels(board.squares(), BOARD_COLUMNS);
    // Top row of the physical board first.
    for (row, label_row) in grid.iter().zip(&labels).rev() {
        for (p, square) in row.iter().zip(label_row) {
            if *square == 0 {
                print!("{:>11}", "");
            } else {
                print!(" {square:>3}:{:>6.4}", p);
            }
        }
        println!();
    }
}

fn run(args: &Args) -> primers::Result<()> {
    let start = Instant::now();
    let board = build_board(args);
    let matrix = board.transition_matrix()?;
    matrix.validate_stochastic(STOCHASTIC_TOLERANCE)?;
    let finish = board.finish_square();

    println!(
        "Board: {} squares, {} chutes, {} ladders ({:?} finish)",
        board.squares(),
        board.chutes().len(),
        board.ladders().len(),
        board.finish_rule()
    );

    let evolution = evolve(
        &matrix,
        &board.initial_state(),
        finish,
        args.turns,
        args.frames,
    )?;
    println!(
        "\nAfter {} turns: P(finished) = {:.6}",
        args.turns, evolution.finished
    );
    println!(
        "Truncated mean = {:.4}, std dev = {:.4}",
        evolution.mean, evolution.std_dev
    );
    for (name, turn) in &evolution.percentiles {
        println!("  {name:>4}: turn {turn}");
    }

    println!("\nDistribution after turn {}:", args.turns);
    print_grid(&board, &evolution.final_distribution);

    let absorption = match AbsorptionAnalysis::analyze(&matrix) {
        Ok(analysis) => Some(analysis),
        Err(e) => {
            println!("\nAbsorbing analysis unavailable: {e}");
            None
        }
    };
    let expected_turns = absorption.as_ref().and_then(|a| a.expected_steps_from(0));
    if let Some(analysis) = &absorption {
        if let Some(turns) = expected_turns {
            println!("\nExpected turns to absorption from start: {turns:.4}");
        }
        for &state in &analysis.absorbing {
            if let Some(p) = analysis.absorption_probability(0, state) {
                println!("  P(absorbed on square {state}) = {p:.6}");
            }
        }
    }

    let simulation = match args.simulate {
        Some(games) => {
            init_rayon_threads();
            let max_turns = (args.turns as u32).max(10_000);
            let result = simulate_games(&board, finish, games, args.seed, max_turns)?;
            println!(
                "\nSimulated {} games: mean {:.4}, std dev {:.4}, median {}, min {}, max {}, unfinished {} ({:.2?})",
                games,
                result.mean,
                result.std_dev,
                result.median,
                result.min,
                result.max,
                result.unfinished,
                result.elapsed
            );
            Some(result)
        }
        None => None,
    };

    if let Some(path) = &args.output {
        let report = Report {
            squares: board.squares(),
            chutes: board.chutes().len(),
            ladders: board.ladders().len(),
            evolution,
            expected_turns,
            absorption,
            simulation,
        };
        write_json(path, &report)?;
        println!("Wrote {path}");
    }

    println!("Done in {:.2?}", start.elapsed());
    Ok(())
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(e) = init_base_path().and_then(|_| run(&args)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
