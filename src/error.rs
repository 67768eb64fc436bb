use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn the review source into a [`Dataset`](crate::data::model::Dataset).
/// Fatal at startup.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("source is missing required column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },

    #[error("row {row}: {message}")]
    MalformedRecord { row: usize, message: String },

    #[error("row {row}, column '{column}': '{value}' {reason}")]
    InvalidField {
        row: usize,
        column: String,
        value: String,
        reason: &'static str,
    },
}

/// Rejected writes to the shared selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("'{0}' is not an airline in the loaded dataset")]
    InvalidSelectionValue(String),
}

/// Invalid dropdown declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("unknown option id '{0}'")]
    UnknownOption(String),

    #[error("option id '{0}' declared twice")]
    DuplicateOption(String),

    #[error("option set is empty")]
    Empty,
}

/// A chart could not be drawn. Only the failing chart is affected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("{chart}: non-finite value {value} for '{key}'")]
    NonFiniteValue {
        chart: &'static str,
        key: String,
        value: f64,
    },
}
