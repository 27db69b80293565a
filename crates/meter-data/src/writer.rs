//! Saving report text to disk.
//!
//! A report never overwrites an earlier one: the first write creates the
//! file, later writes append after a separator banner.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use meter_core::error::{ReportError, Result};
use tracing::info;

/// Placed between an existing file's contents and an appended report.
pub const NEW_REPORT_BANNER: &str = "\n--- new report begins here ---\n\n";

/// What [`persist_report`] did with the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Created,
    Appended,
}

impl fmt::Display for PersistOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistOutcome::Created => f.write_str("created"),
            PersistOutcome::Appended => f.write_str("appended"),
        }
    }
}

/// Write `text` to `path`, creating the file when absent and otherwise
/// appending it after [`NEW_REPORT_BANNER`]. Existing contents are never
/// touched.
pub fn persist_report(path: &Path, text: &str) -> Result<PersistOutcome> {
    let persist_error = |source: std::io::Error| ReportError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let outcome = if path.exists() {
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(persist_error)?;
        file.write_all(NEW_REPORT_BANNER.as_bytes())
            .and_then(|()| file.write_all(text.as_bytes()))
            .map_err(persist_error)?;
        PersistOutcome::Appended
    } else {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(persist_error)?;
        file.write_all(text.as_bytes()).map_err(persist_error)?;
        PersistOutcome::Created
    };

    info!("{} {}", path.display(), outcome);
    Ok(outcome)
}
