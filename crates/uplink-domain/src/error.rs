use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("payload type mismatch: expected {expected}")]
    PayloadMismatch { expected: &'static str },

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
