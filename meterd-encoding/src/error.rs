use thiserror::Error;

/// Errors raised by the register byte codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("short buffer: need {need} bytes, got {got}")]
    ShortBuffer { need: usize, got: usize },

    #[error("odd buffer length {0}: register data comes in byte pairs")]
    OddLength(usize),
}

/// Result type alias for codec operations
pub type EncodingResult<T> = Result<T, EncodingError>;
