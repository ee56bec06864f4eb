use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("unsupported fPort: {0}")]
    UnsupportedPort(u8),

    #[error("payload too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("truncated field: {0}")]
    TruncatedField(&'static str),

    #[error("decoded timestamp too far in the future")]
    TimeTooFarOff,

    #[error("no frame shape matches payload length {0}")]
    UnknownFrameLength(usize),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
