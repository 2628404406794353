//! Function error types.

use thiserror::Error;

/// Errors raised while reading a request or building a response.
///
/// None of these are retryable: every one of them ends the invocation with a
/// fatal result.
#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("invalid function input: {0}")]
    InvalidInput(String),

    #[error("cannot convert value: {0}")]
    Conversion(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("kind {0} is not registered")]
    UnregisteredKind(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type FunctionResult<T> = Result<T, FunctionError>;
