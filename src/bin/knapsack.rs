//! Top-down 0/1 knapsack.
//!
//! Defaults to the five-item demo instance (capacity 9, best value 33).

use std::time::Instant;

use clap::Parser;
use serde::Serialize;

use primers::constants::{DEMO_CAPACITY, DEMO_VALUES, DEMO_WEIGHTS};
use primers::env_config::{init_base_path, init_logging};
use primers::knapsack::{
    brute_force, items_from_columns, Decision, KnapsackSolution, KnapsackSolver, KnapsackState,
};
use primers::storage::write_json;

#[derive(Parser, Debug)]
#[command(name = "primers-knapsack", about = "Memoized 0/1 knapsack solver")]
struct Args {
    /// Item weights, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = DEMO_WEIGHTS.to_vec())]
    weights: Vec<u64>,

    /// Item values, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = DEMO_VALUES.to_vec())]
    values: Vec<u64>,

    /// Knapsack capacity
    #[arg(long, default_value_t = DEMO_CAPACITY)]
    capacity: u64,

    /// Only decide the last N items (default: all)
    #[arg(long)]
    items_remaining: Option<usize>,

    /// Cross-check against exhaustive search (small instances only)
    #[arg(long)]
    verify: bool,

    /// Write a JSON report to this path
    #[arg(long)]
    output: Option<String>,
}

#[derive(Serialize)]
struct Report {
    capacity: u64,
    items_remaining: usize,
    solution: KnapsackSolution,
    memo_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    brute_force: Option<u64>,
}

fn run(args: &Args) -> primers::Result<()> {
    let start = Instant::now();
    let items = items_from_columns(&args.weights, &args.values)?;
    let n = items.len();
    let mut solver = KnapsackSolver::new(items)?;

    let items_remaining = args.items_remaining.unwrap_or(n);
    let state = KnapsackState::new(items_remaining, args.capacity);
    let solution = solver.solve_from(state)?;

    println!(
        "{} items, capacity {}: best value {} (weight {})",
        items_remaining, args.capacity, solution.value, solution.total_weight
    );
    println!("{:>6} {:>8} {:>8}  decision", "item", "weight", "value");
    for &(index, decision) in &solution.decisions {
        let item = solver.items()[index];
        let label = match decision {
            Decision::Include => "include",
            Decision::Exclude => "exclude",
        };
        println!(
            "{:>6} {:>8} {:>8}  {}",
            index, item.weight, item.value, label
        );
    }
    println!("Memo entries: {}", solver.memo_len());

    let brute = if args.verify {
        let tail = &solver.items()[n - items_remaining..];
        match brute_force(tail, args.capacity)? {
            Some(best) => {
                let verdict = if best == solution.value { "OK" } else { "MISMATCH" };
                println!("Exhaustive search: {best} [{verdict}]");
                Some(best)
            }
            None => {
                println!("Exhaustive search skipped: too many items");
                None
            }
        }
    } else {
        None
    };

    if let Some(path) = &args.output {
        let report = Report {
            capacity: args.capacity,
            items_remaining,
            memo_entries: solver.memo_len(),
            solution,
            brute_force: brute,
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
