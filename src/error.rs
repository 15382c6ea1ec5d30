use std::path::PathBuf;

use thiserror::Error;

use crate::data::filter::FilterDimension;
use crate::data::model::Value;

// ---------------------------------------------------------------------------
// Load errors: the dataset could not be constructed
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("reading arrow record batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("unsupported dataset format: {0:?}")]
    UnsupportedFormat(PathBuf),
    #[error("malformed dataset: {0}")]
    Malformed(String),
    #[error("dataset has no rows")]
    NoRows,
}

// ---------------------------------------------------------------------------
// Selection / schema errors
// ---------------------------------------------------------------------------

/// The requested value is not one of the dimension's distinct values.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("'{value}' is not a known value of {dimension}")]
pub struct InvalidSelectionError {
    pub dimension: FilterDimension,
    pub value: Value,
}

/// A column the pipeline depends on is absent from the loaded schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("dataset has no '{column}' column")]
pub struct MissingColumnError {
    pub column: String,
}

impl MissingColumnError {
    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("writing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

// ---------------------------------------------------------------------------
// Umbrella error for the pipeline API
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    InvalidSelection(#[from] InvalidSelectionError),
    #[error(transparent)]
    MissingColumn(#[from] MissingColumnError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
