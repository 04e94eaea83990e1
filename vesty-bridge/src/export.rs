//! Saving the console log to disk.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use vesty_core::export_file_name;

/// Date stamped into the file name. Always the UTC calendar day, whatever
/// the local zone.
pub fn save_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// Write `text` to `<dir>/terminal-log-<date>.txt`, replacing any earlier
/// save from the same day. Returns the path written.
pub fn save_transcript(dir: &Path, date: NaiveDate, text: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join(export_file_name(date));
    std::fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), bytes = text.len(), "transcript saved");
    Ok(path)
}
