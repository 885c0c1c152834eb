//! Error types for loading world artifacts.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for world artifact operations.
pub type WorldResult<T> = Result<T, WorldError>;

/// Errors that can occur while reading or writing world artifacts.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Failed to read the file.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the file or create its directory.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON for the expected artifact.
    #[error("malformed {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The grid does not have the declared dimensions.
    #[error("grid {} declares worldsize {expected} but has {rows} rows (first short row: {short_row:?})", path.display())]
    Dimensions {
        path: PathBuf,
        expected: u32,
        rows: usize,
        short_row: Option<usize>,
    },

    /// The world size is zero.
    #[error("grid {} has an empty world", path.display())]
    EmptyWorld { path: PathBuf },
}
