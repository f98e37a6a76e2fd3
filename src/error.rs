use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an analysis run. Recoverable conditions
/// (absent data fields, malformed frames, degenerate timestamps)
/// are absorbed during the pass and never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// Input path does not point to a regular file.
    #[error("input is not a regular file: {0}")]
    InputNotFound(PathBuf),

    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("csv output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("status document error: {0}")]
    JsonError(#[from] serde_json::Error),
}
