use std::path::PathBuf;

use thiserror::Error;

/// Why a dataset could not be loaded. Field-level problems never end up
/// here; those are defaulted and counted in the [`LoadReport`](super::model::LoadReport).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding parquet batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("no columns to parse from file")]
    NoColumns,

    #[error("{0}")]
    InvalidShape(String),
}

pub type LoadResult<T> = Result<T, LoadError>;
