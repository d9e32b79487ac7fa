//! Error types for the fallible boundaries of the crate
//!
//! The engine itself never fails on legal input; these cover parsing
//! front-end input, validating externally supplied grids and the storage layer.

use thiserror::Error;

/// A grid supplied from outside the engine does not satisfy its invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell ({row}, {col}) holds {value}, which is not a power of two >= 2")]
    InvalidTile { row: usize, col: usize, value: u32 },

    #[error("cell buffer has {found} cells, expected {expected}")]
    BufferSize { expected: usize, found: usize },
}

/// Unrecognised direction text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction: {0:?}")]
pub struct ParseDirectionError(pub String);

/// Key/value storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage rejected write for key {0}")]
    WriteRejected(String),
}

/// Save game encode/decode failures
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("saved grid is invalid: {0}")]
    InvalidGrid(#[from] GridError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
