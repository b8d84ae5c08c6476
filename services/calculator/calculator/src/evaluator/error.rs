use derive_more::Display;

use calculator_client::{ErrorCode, ErrorDetail};
use telemetry::IsErr;

/// A failure to evaluate an otherwise well-formed request
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Division or remainder by zero
    #[display(fmt = "{}", _0)]
    Arithmetic(String),

    /// Missing or unsupported operator, exponent out of range, tree too deep
    #[display(fmt = "{}", _0)]
    InvalidArgument(String),
}

impl std::error::Error for EvalError {}

impl EvalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EvalError::Arithmetic(_) => ErrorCode::Arithmetic,
            EvalError::InvalidArgument(_) => ErrorCode::InvalidArgument,
        }
    }
}

impl From<EvalError> for ErrorDetail {
    fn from(e: EvalError) -> Self {
        let code = e.code();
        match e {
            EvalError::Arithmetic(message) | EvalError::InvalidArgument(message) => {
                ErrorDetail::new(code, message)
            }
        }
    }
}

// Caused by the request, not by the service
impl IsErr for EvalError {
    fn is_err(&self) -> bool {
        false
    }
}
