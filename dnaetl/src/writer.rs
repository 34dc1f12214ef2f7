//! Output document writer

use std::path::{Path, PathBuf};

use dnaetl_common::Result;
use serde::Serialize;
use tracing::info;

/// Write `document` as pretty JSON to `<results_dir>/<participant_id>.json`
///
/// Missing directories are created; an existing file is overwritten.
pub fn write_output<T: Serialize>(
    results_dir: &Path,
    participant_id: &str,
    document: &T,
) -> Result<PathBuf> {
    std::fs::create_dir_all(results_dir)?;

    let path = results_dir.join(format!("{}.json", participant_id));
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(&path, json)?;

    info!("Wrote results to {}", path.display());
    Ok(path)
}
