//! Long-run square frequencies on a Monopoly board.

use std::time::Instant;

use clap::Parser;
use serde::Serialize;

use primers::constants::{MONOPOLY_SQUARES, STOCHASTIC_TOLERANCE};
use primers::env_config::{init_base_path, init_logging};
use primers::markov::board::Track;
use primers::markov::evolution::{distribution_after, stationary_distribution, trajectory};
use primers::markov::matrix::Distribution;
use primers::markov::monopoly::MonopolyBoard;
use primers::storage::write_json;

#[derive(Parser, Debug)]
#[command(name = "primers-monopoly", about = "Monopoly square frequencies")]
struct Args {
    #[arg(long, default_value_t = MONOPOLY_SQUARES)]
    squares: usize,

    /// Maximum power-iteration steps
    #[arg(long, default_value_t = 2_000)]
    iterations: usize,

    /// Send tokens landing on square 30 to jail (square 10)
    #[arg(long)]
    go_to_jail: bool,

    /// Turns to push the start distribution forward
    #[arg(long, default_value_t = 500)]
    turns: usize,

    /// Keep the distribution after every turn in the report
    #[arg(long)]
    frames: bool,

    /// L1 change between turns treated as converged
    #[arg(long, default_value_t = 1e-12)]
    tolerance: f64,

    /// Write a JSON report to this path
    #[arg(long)]
    output: Option<String>,
}

#[derive(Serialize)]
struct Report {
    squares: usize,
    go_to_jail: bool,
    iterations: usize,
    after_one_turn: Vec<f64>,
    turns: usize,
    after_turns: Vec<f64>,
    stationary: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frames: Option<Vec<Distribution>>,
}

fn run(args: &Args) -> primers::Result<()> {
    let start = Instant::now();
    let mut board = MonopolyBoard::new(args.squares);
    if args.go_to_jail {
        board = board.with_go_to_jail();
    }
    let matrix = board.transition_matrix()?;
    matrix.validate_stochastic(STOCHASTIC_TOLERANCE)?;
    let initial = board.initial_state();

    let after_one_turn = distribution_after(&matrix, &initial, 1)?;
    let (after_turns, frames) = if args.frames {
        let frames = trajectory(&matrix, &initial, args.turns)?;
        let last = frames.last().cloned().unwrap_or_default();
        (last, Some(frames))
    } else {
        (distribution_after(&matrix, &initial, args.turns)?, None)
    };
    let (stationary, iterations) =
        stationary_distribution(&matrix, &initial, args.tolerance, args.iterations)?;

    println!(
        "{} squares{}: converged after {} turns",
        board.squares(),
        if args.go_to_jail { " with Go To Jail" } else { "" },
        iterations
    );
    let turn_label = format!("turn {}", args.turns);
    println!(
        "{:>6} {:>10} {:>10} {:>10}",
        "square", "turn 1", turn_label, "long run"
    );
    for (square, ((p1, pn), pi)) in after_one_turn
        .iter()
        .zip(&after_turns)
        .zip(&stationary)
        .enumerate()
    {
        println!("{square:>6} {p1:>10.6} {pn:>10.6} {pi:>10.6}");
    }

    let mut ranked: Vec<(usize, f64)> = stationary.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    println!("\nMost visited:");
    for (square, p) in ranked.iter().take(5) {
        println!("  square {square:>2}: {:.4}%", p * 100.0);
    }

    if let Some(path) = &args.output {
        let report = Report {
            squares: board.squares(),
            go_to_jail: args.go_to_jail,
            iterations,
            after_one_turn,
            turns: args.turns,
            after_turns,
            stationary,
            frames,
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
