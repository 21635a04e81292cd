//! Error types for the valsheet engine

use std::path::PathBuf;

use thiserror::Error;
use valsheet_csv::CsvError;

use crate::model::MetricKey;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by loading, extraction and analytics
#[derive(Debug, Error)]
pub enum Error {
    /// Workbook or worksheet error
    #[error(transparent)]
    Core(#[from] valsheet_core::Error),

    /// Reading a delimited text file failed
    #[error(transparent)]
    Csv(#[from] CsvError),

    /// File extension with no reader
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// No sheet yielded a model scoring at least the minimum
    #[error("No financial model detected")]
    NoModelDetected,

    /// An analytic needs a value the model does not have
    #[error("Model has no {0} value")]
    MissingInput(MetricKey),
}
