use crate::common::Value;
use crate::parse::ParseError;

pub type DResult<T> = Result<T, DiceError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DiceError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("cannot get the value of a die that hasn't been rolled")]
    NotRolled,
    #[error("{0}")]
    InvalidState(String),
    #[error("cannot compare {} {} with {} {}", .left.type_name(), .left, .right.type_name(), .right)]
    TypeMismatch { left: Value, right: Value },
    #[error("index {index} is out of bounds for a collection of {len} dice")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl DiceError {
    pub fn invalid_argument(msg: impl ToString) -> Self {
        Self::InvalidArgument(msg.to_string())
    }

    pub fn invalid_state(msg: impl ToString) -> Self {
        Self::InvalidState(msg.to_string())
    }

    pub(crate) fn type_mismatch(left: &Value, right: &Value) -> Self {
        Self::TypeMismatch {
            left: left.clone(),
            right: right.clone(),
        }
    }
}
