// File: crates/chart-core/src/error.rs
// Summary: Error type shared by configuration parsing, data reading and export.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("dataset {0} is not listed")]
    UnknownDataset(String),

    #[error("indicator not set for chart {0:?}")]
    MissingIndicator(String),

    #[error("malformed JSON in `{field}`: {source}")]
    MalformedJson {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value {value:?} for `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot interpret {0:?} as a time")]
    InvalidTime(String),

    #[error("clone and original diverge at {path}: {reason}")]
    StructureMismatch { path: String, reason: String },

    #[error("stylesheet error near block {block}: {reason}")]
    Stylesheet { block: usize, reason: String },

    #[error("data reader failed: {0}")]
    Reader(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChartError {
    pub(crate) fn invalid(field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ChartError::InvalidField { field, value: value.into(), reason: reason.into() }
    }
}
