//! Test channels — `BroadcastChannel` doubles that record or refuse.

use std::sync::Mutex;

use async_trait::async_trait;
use nutshell_core::channel::{BroadcastChannel, Envelope};
use nutshell_core::error::DomainError;

/// A channel that records every published envelope and never delivers.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    published: Mutex<Vec<Envelope>>,
}

impl RecordingChannel {
    /// Create an empty recording channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything published so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published(&self) -> Vec<Envelope> {
        self.published.lock().unwrap().clone()
    }

    /// Envelopes published on `topic`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published_on(&self, topic: &str) -> Vec<Envelope> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BroadcastChannel for RecordingChannel {
    async fn publish(&self, envelope: Envelope) -> Result<(), DomainError> {
        self.published.lock().unwrap().push(envelope);
        Ok(())
    }
}

/// A channel that is never ready. Useful for testing error-handling paths.
#[derive(Debug)]
pub struct UnavailableChannel;

#[async_trait]
impl BroadcastChannel for UnavailableChannel {
    async fn publish(&self, _envelope: Envelope) -> Result<(), DomainError> {
        Err(DomainError::ChannelUnavailable("socket not connected".into()))
    }
}
