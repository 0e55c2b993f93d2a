//! Shared environment configuration for the primer binaries.
//!
//! Consolidates the `PRIMERS_BASE_PATH`, `RAYON_NUM_THREADS` and `RUST_LOG`
//! reads shared by all four binaries.

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Install the global `tracing` subscriber. Filter comes from `RUST_LOG`
/// (default `info`). Safe to call more than once.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Read `PRIMERS_BASE_PATH` (default `"."`) and chdir into it, so relative
/// `--output` paths land there.
pub fn init_base_path() -> Result<PathBuf> {
    let base_path = std::env::var("PRIMERS_BASE_PATH").unwrap_or_else(|_| ".".to_string());
    std::env::set_current_dir(&base_path)?;
    let cwd = std::env::current_dir()?;
    info!(base_path = %base_path, cwd = %cwd.display(), "working directory");
    Ok(PathBuf::from(base_path))
}

/// Number of worker threads from `RAYON_NUM_THREADS` (fallback
/// `OMP_NUM_THREADS`, default 8).
pub fn rayon_thread_count() -> usize {
    std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&n: &usize| n > 0)
        .unwrap_or(8)
}

/// Build the rayon global pool. Tolerates an already-initialized pool.
/// Returns thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = rayon_thread_count();
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok(); // May fail if already initialized
    info!(threads = num_threads, "rayon pool");
    num_threads
}
