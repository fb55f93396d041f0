use thiserror::Error;

/// Validation errors raised by the form stores. These are user mistakes, never
/// storage failures: nothing is written when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("Unknown {kind} '{name}'. Use one of: {expected}")]
    UnknownCounter {
        kind: &'static str,
        name: String,
        expected: String,
    },

    #[error("Enter a valid positive number (got '{0}')")]
    InvalidAmount(String),

    #[error("Please enter at least one value")]
    NothingToAssess,

    #[error("No item at position {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl AppError {
    pub fn invalid_amount(value: impl ToString) -> Self {
        Self::InvalidAmount(value.to_string())
    }
}
