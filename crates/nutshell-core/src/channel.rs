//! Broadcast channel abstraction.
//!
//! The channel fans every published envelope out to all connected
//! participants, the publisher included. It is publish-and-forget: there is
//! no acknowledgement and nothing is ever read back by the sender.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Topic carrying relayed roll requests.
pub const ROLL_REQUEST_TOPIC: &str = "system.nutshell";

/// Topic carrying announced roll results.
pub const CHAT_TOPIC: &str = "chat";

/// A message in transit on the broadcast channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Routing topic.
    pub topic: String,
    /// JSON payload, interpreted by subscribers of the topic.
    pub payload: serde_json::Value,
}

impl Envelope {
    /// Serializes `message` into an envelope on `topic`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if `message` cannot be
    /// represented as JSON.
    pub fn new<T: Serialize>(topic: &str, message: &T) -> Result<Self, DomainError> {
        let payload = serde_json::to_value(message)
            .map_err(|e| DomainError::Infrastructure(format!("payload serialization failed: {e}")))?;
        Ok(Self {
            topic: topic.to_owned(),
            payload,
        })
    }

    /// Decodes the payload as `T`, or `None` if it does not match.
    #[must_use]
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

/// Fan-out transport shared by every participant.
#[async_trait]
pub trait BroadcastChannel: Send + Sync {
    /// Publishes an envelope to every connected subscriber.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ChannelUnavailable` if the channel is not ready.
    async fn publish(&self, envelope: Envelope) -> Result<(), DomainError>;
}
