//! Domain error types.
//!
//! Every variant is a terminal abort of a single roll transaction or
//! character mutation. A GM declining a prompt is not an error and has
//! no variant here.

use thiserror::Error;

use crate::participant::ActorRef;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No authoritative resolver (active GM) is connected.
    #[error("no active GM is connected to resolve the roll")]
    NoAuthority,

    /// The broadcast channel is not ready to carry messages.
    #[error("broadcast channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// A character reference could not be dereferenced.
    #[error("unknown character: {0}")]
    UnknownTarget(ActorRef),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure error (poisoned lock, serialization failure).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
