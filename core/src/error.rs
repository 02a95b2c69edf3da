use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid date: '{input}' (expected YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("year {0} is outside the supported calendar range")]
    YearOutOfRange(i32),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    // History provider / label registry failures. Never retried here.
    #[error("provider error: {0:#}")]
    Provider(anyhow::Error),
}

impl CoreError {
    pub fn invalid_date(input: impl Into<String>) -> Self {
        CoreError::InvalidDate { input: input.into() }
    }

    pub fn provider(err: anyhow::Error) -> Self {
        CoreError::Provider(err)
    }

    pub fn is_invalid_date(&self) -> bool {
        matches!(self, CoreError::InvalidDate { .. } | CoreError::YearOutOfRange(_))
    }
}
