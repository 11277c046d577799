use std::path::PathBuf;

use thiserror::Error;

/// Reason a weight vector cannot drive a sampler.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightError {
    #[error("no weights")]
    Empty,

    #[error("weight at row {index} is missing or not numeric")]
    Missing { index: usize },

    #[error("weight at row {index} is not finite")]
    NonFinite { index: usize },

    #[error("weight at row {index} is negative ({value})")]
    Negative { index: usize, value: f64 },

    #[error("weights sum to zero")]
    ZeroTotal,

    #[error("weights sum overflows")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("unknown field: {name}")]
    UnknownField { name: String },

    #[error("invalid weights in column {column}: {source}")]
    InvalidWeights {
        column: String,
        #[source]
        source: WeightError,
    },

    #[error("invalid weights in column {column} for group {group}: {source}")]
    InvalidGroupWeights {
        column: String,
        group: String,
        #[source]
        source: WeightError,
    },

    #[error("field {name} has {missing} missing values and no observed values to draw from")]
    NoObservedValues { name: String, missing: usize },

    #[error("cannot draw {requested} rows without replacement from {available}")]
    SampleTooLarge { requested: usize, available: usize },

    #[error("bin width must be positive and finite, got {width}")]
    InvalidBinWidth { width: f64 },

    #[error("failed to read sentinel table {path}: {source}")]
    SentinelIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sentinel table {path}: {source}")]
    SentinelToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("dataframe error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;

impl TransformError {
    pub(crate) fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }

    /// True for both the whole-dataset and the per-group weight failures.
    pub fn is_invalid_weights(&self) -> bool {
        matches!(
            self,
            Self::InvalidWeights { .. } | Self::InvalidGroupWeights { .. }
        )
    }
}
