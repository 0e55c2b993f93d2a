//! JSON report files.
//!
//! Every binary can write its result with `--output`; the report structs all
//! derive `Serialize`, so one pair of helpers covers them.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;

/// Write `value` as pretty-printed JSON, creating parent directories.
/// An existing file is replaced.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let start = Instant::now();
    if file_exists(path) {
        warn!(path = %path.display(), "overwriting existing report");
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(
        path = %path.display(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "wrote report"
    );
    Ok(())
}

/// Read a JSON report written by [`write_json`].
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    Ok(serde_json::from_reader(reader)?)
}

/// Check if a file exists on disk.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}
