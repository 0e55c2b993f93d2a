//! Worst-case egg-drop table.
//!
//! Prints the minimum number of drops that always finds the critical floor,
//! the first floor to try, and optionally the whole table or a replay of the
//! strategy against a chosen critical floor.

use std::time::Instant;

use clap::Parser;
use serde::Serialize;

use primers::constants::{DEFAULT_EGGS, DEFAULT_FLOORS};
use primers::egg_drop::{DropStrategy, EggDropTable, SearchTrace};
use primers::env_config::{init_base_path, init_logging};
use primers::storage::write_json;

#[derive(Parser, Debug)]
#[command(name = "primers-egg-drop", about = "Worst-case egg-drop solver")]
struct Args {
    /// Number of eggs available
    #[arg(long, default_value_t = DEFAULT_EGGS)]
    eggs: usize,

    /// Number of floors in the building
    #[arg(long, default_value_t = DEFAULT_FLOORS)]
    floors: usize,

    /// Print the worst-case drops for every (eggs, floors) pair
    #[arg(long)]
    table: bool,

    /// Replay the strategy when floors 1..=N are safe
    #[arg(long)]
    safe_floor: Option<usize>,

    /// Write a JSON report to this path
    #[arg(long)]
    output: Option<String>,
}

#[derive(Serialize)]
struct Report {
    eggs: usize,
    floors: usize,
    worst_case_drops: usize,
    first_test_floor: usize,
    /// `by_eggs[e - 1]` is the strategy at full height with `e` eggs.
    by_eggs: Vec<DropStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<SearchTrace>,
}

fn print_table(table: &EggDropTable) {
    print!("{:>8}", "floors");
    for e in 1..=table.eggs() {
        print!("{:>6}", format!("e={e}"));
    }
    println!();
    for f in 0..=table.floors() {
        print!("{f:>8}");
        for e in 1..=table.eggs() {
            print!("{:>6}", table.worst_case(e, f).unwrap_or(0));
        }
        println!();
    }
}

fn run(args: &Args) -> primers::Result<()> {
    let start = Instant::now();
    let table = EggDropTable::build(args.eggs, args.floors)?;
    let strategy = table
        .get(args.eggs, args.floors)
        .unwrap_or(DropStrategy::EMPTY);

    println!(
        "{} eggs, {} floors: {} drops in the worst case (first drop from floor {})",
        args.eggs, args.floors, strategy.worst_case_drops, strategy.test_floor
    );

    if args.table {
        print_table(&table);
    }

    let search = match args.safe_floor {
        Some(safe) => {
            let trace = table.search(safe)?;
            println!("\nReplay with floors 1..={safe} safe:");
            for (i, drop) in trace.drops.iter().enumerate() {
                println!(
                    "  drop {:>2}: floor {:>4}  {}  ({} eggs left)",
                    i + 1,
                    drop.floor,
                    if drop.broke { "breaks" } else { "survives" },
                    drop.eggs_left
                );
            }
            println!(
                "  highest safe floor = {} after {} drops",
                trace.highest_safe,
                trace.drops.len()
            );
            Some(trace)
        }
        None => None,
    };

    if let Some(path) = &args.output {
        let report = Report {
            eggs: args.eggs,
            floors: args.floors,
            worst_case_drops: strategy.worst_case_drops,
            first_test_floor: strategy.test_floor,
            by_eggs: table.column(args.floors).unwrap_or_default(),
            search,
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
