use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the meter report engine.
#[derive(Error, Debug)]
pub enum ReportError {
    /// An input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row of an input file did not match the expected feed layout.
    #[error("Data format error in {path} line {line}: {reason}")]
    DataFormat {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// A period report selected no samples recorded exactly at midnight, so
    /// the once-daily average is undefined.
    #[error("No midnight samples for {period}; cannot compute the daily average")]
    NoMidnightSamples { period: String },

    /// A report that needs at least one sample was given none.
    #[error("No samples to report on")]
    EmptyDataset,

    /// A month number outside 1–12 reached the reporter.
    #[error("Invalid month number: {0}")]
    InvalidMonth(u32),

    /// A report could not be written to its target file.
    #[error("Failed to write report to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the meter crates.
pub type Result<T> = std::result::Result<T, ReportError>;
