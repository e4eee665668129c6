use meterd_encoding::EncodingError;
use thiserror::Error;

/// Main error type for meter operations
#[derive(Error, Debug)]
pub enum MeterError {
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] EncodingError),

    #[error("invalid SunSpec device signature 0x{0:08x}")]
    Signature(u32),

    #[error("short register block: need {need} bytes, got {got}")]
    ShortBlock { need: usize, got: usize },

    #[error("timeout")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("duplicate device address {0}")]
    DuplicateDevice(u8),

    #[error("unknown device type: {0}")]
    UnknownDeviceType(String),

    #[error("duplicate producer type {0}")]
    DuplicateProducer(String),
}

/// Result type alias for meter operations
pub type MeterResult<T> = Result<T, MeterError>;
