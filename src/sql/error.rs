use thiserror::Error;

/// Errors raised while assembling SQL text. Both are caller-input errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlError {
    #[error("No data")]
    NoData,

    #[error("Invalid field: {0}")]
    InvalidField(String),
}
