//! In-process broadcast transport over `tokio::sync::broadcast`.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use nutshell_core::channel::{BroadcastChannel, Envelope};
use nutshell_core::error::DomainError;
use tokio::sync::broadcast;
use tracing::debug;

/// Fans envelopes out to every live receiver, the publisher's own
/// included.
#[derive(Debug)]
pub struct TokioBroadcastChannel {
    sender: broadcast::Sender<Envelope>,
    available: AtomicBool,
}

impl TokioBroadcastChannel {
    /// Creates a channel buffering up to `capacity` envelopes per receiver.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; `TableConfig` rejects that value.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            available: AtomicBool::new(true),
        }
    }

    /// A new receiver that sees every envelope published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.sender.subscribe()
    }

    /// Simulates the socket going down (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Whether publishes are currently accepted.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BroadcastChannel for TokioBroadcastChannel {
    async fn publish(&self, envelope: Envelope) -> Result<(), DomainError> {
        if !self.is_available() {
            return Err(DomainError::ChannelUnavailable(
                "socket not connected".to_owned(),
            ));
        }
        let topic = envelope.topic.clone();
        let receivers = self.sender.send(envelope).map_err(|_| {
            DomainError::ChannelUnavailable("no connected subscribers".to_owned())
        })?;
        debug!(topic = %topic, receivers, "envelope published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutshell_core::channel::CHAT_TOPIC;
    use serde_json::json;

    fn envelope() -> Envelope {
        Envelope {
            topic: CHAT_TOPIC.to_owned(),
            payload: json!({"n": 1}),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_every_receiver() {
        let channel = TokioBroadcastChannel::new(8);
        let mut a = channel.subscribe();
        let mut b = channel.subscribe();

        channel.publish(envelope()).await.unwrap();

        assert_eq!(a.try_recv().unwrap(), envelope());
        assert_eq!(b.try_recv().unwrap(), envelope());
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_envelopes() {
        let channel = TokioBroadcastChannel::new(8);
        let _early = channel.subscribe();
        channel.publish(envelope()).await.unwrap();

        let mut late = channel.subscribe();
        assert!(late.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unavailable_channel_rejects_publish() {
        let channel = TokioBroadcastChannel::new(8);
        let mut rx = channel.subscribe();
        channel.set_available(false);

        let result = channel.publish(envelope()).await;

        assert!(matches!(result, Err(DomainError::ChannelUnavailable(_))));
        assert!(rx.try_recv().is_err());

        channel.set_available(true);
        channel.publish(envelope()).await.unwrap();
        assert_eq!(rx.try_recv().unwrap(), envelope());
    }

    #[tokio::test]
    async fn test_publish_without_receivers_is_unavailable() {
        let channel = TokioBroadcastChannel::new(8);
        let result = channel.publish(envelope()).await;
        assert!(matches!(result, Err(DomainError::ChannelUnavailable(_))));
    }
}
