use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Load-time errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while reading and preparing the workout table.
///
/// These are fatal at startup; once a [`PreparedTable`](crate::data::model::PreparedTable)
/// exists nothing downstream can fail.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("unreadable Arrow column: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("required column '{0}' is missing from the dataset")]
    MissingColumn(&'static str),

    #[error("malformed dataset: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Label parsing
// ---------------------------------------------------------------------------

/// A selection label that names no bucket of the given axis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {axis} '{label}' (expected one of: {expected})")]
pub struct UnknownCategory {
    pub axis: &'static str,
    pub label: String,
    pub expected: String,
}
