//! Nutshell table — host error types.

use std::fmt;

use nutshell_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the host session.
#[derive(Debug, Error)]
pub enum TableError {
    /// An environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Console or file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The character file is not a JSON array of character records.
    #[error("character file error: {0}")]
    Json(#[from] serde_json::Error),

    /// A domain operation failed outside of a console command.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Console-facing wrapper around `DomainError` that prefixes a stable
/// error code to the message.
#[derive(Debug)]
pub struct ConsoleError(pub DomainError);

impl ConsoleError {
    /// Machine-readable code for the wrapped error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match &self.0 {
            DomainError::NoAuthority => "no_authority",
            DomainError::ChannelUnavailable(_) => "channel_unavailable",
            DomainError::UnknownTarget(_) => "unknown_target",
            DomainError::Validation(_) => "validation_error",
            DomainError::Infrastructure(_) => "infrastructure_error",
        }
    }
}

impl From<DomainError> for ConsoleError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error [{}]: {}", self.code(), self.0)
    }
}
