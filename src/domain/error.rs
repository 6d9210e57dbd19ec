//! Domain error types

use thiserror::Error;

/// Errors that can occur while building or driving a QE probe
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<std::io::Error> for ProbeError {
    fn from(e: std::io::Error) -> Self {
        ProbeError::Io(e.to_string())
    }
}

/// Result type alias for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;
