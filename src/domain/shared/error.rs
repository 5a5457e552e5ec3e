//! Domain errors

use thiserror::Error;

/// Domain result type
pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Speech unavailable: {0}")]
    SpeechUnavailable(String),

    #[error("Responder unavailable: {0}")]
    ResponderUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
