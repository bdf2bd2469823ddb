use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the pixel engine.
///
/// Only `InvalidGrid` and `InvalidDimension` are programmer errors. The rest
/// are reported to the caller, who normally degrades to drawing nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid buffer dimensions: {width}x{height}")]
    InvalidDimension { width: i64, height: i64 },

    #[error("Pixel ({x}, {y}) is outside the buffer")]
    OutOfBounds { x: i64, y: i64 },

    #[error("Cell ({row}, {col}) is outside a {rows}x{columns} sprite sheet")]
    IndexOutOfRange {
        row: i32,
        col: i32,
        rows: u32,
        columns: u32,
    },

    #[error("Invalid sprite sheet grid: {rows} rows x {columns} columns")]
    InvalidGrid { rows: i32, columns: i32 },

    #[error("Failed to load image {}: {reason}", path.display())]
    LoadFailure { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
