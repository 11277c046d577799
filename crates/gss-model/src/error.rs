use thiserror::Error;

/// Violations of the column layout invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("duplicate field name: {name}")]
    DuplicateField { name: String },
    #[error("field {name} has an empty span [{start}, {end})")]
    InvalidSpan {
        name: String,
        start: usize,
        end: usize,
    },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
