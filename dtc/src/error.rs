use qsim::SimError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DtcError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Division by zero: the shot budget is 0")]
    DivisionByZero,
    /// Failures of the circuit executor, passed through untouched.
    #[error(transparent)]
    Execution(#[from] SimError),
}

pub type Result<T> = std::result::Result<T, DtcError>;

pub(crate) fn invalid(msg: impl Into<String>) -> DtcError {
    DtcError::InvalidArgument(msg.into())
}
