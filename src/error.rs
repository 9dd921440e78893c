use std::io;
use std::path::PathBuf;

/// Errors that stop a report run.
///
/// Unparsable log lines are not errors; they are skipped while parsing.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The input log could not be read
    #[error("could not read log file '{}': {source}", path.display())]
    ReadInput { path: PathBuf, source: io::Error },

    /// A report file could not be created or written
    #[error("could not write '{}': {source}", path.display())]
    WriteOutput { path: PathBuf, source: io::Error },

    /// The summary could not be encoded as JSON
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The tracing subscriber could not be installed
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
