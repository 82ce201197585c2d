//! Transport: The push-channel client the engine subscribes through.

use super::event::RawEvent;
use crate::error::TransportError;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use serde_json::Value;
use std::time::Duration;

/// Result of one poll of the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportPoll {
    /// An event was delivered.
    Event(RawEvent),
    /// Nothing arrived within the timeout.
    Idle,
    /// The connection is gone for good.
    Closed,
}

/// A realtime messaging client.
///
/// Authentication and the provider's wire protocol live behind this trait.
pub trait RealtimeTransport: Send {
    /// Subscribe to `channel`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the handshake fails.
    fn subscribe(&mut self, channel: &str) -> Result<(), TransportError>;

    /// Wait up to `timeout` for the next delivery.
    fn poll(&mut self, timeout: Duration) -> TransportPoll;
}

/// In-process transport fed by a [`QueuePublisher`].
///
/// Useful when the host already runs a websocket client and only needs to
/// hand deliveries over, and in tests.
#[derive(Debug)]
pub struct QueueTransport {
    receiver: Receiver<RawEvent>,
    reject: Option<String>,
}

/// Sending half of a [`QueueTransport`]. Dropping every publisher closes it.
#[derive(Debug, Clone)]
pub struct QueuePublisher {
    sender: Sender<RawEvent>,
}

impl QueueTransport {
    /// Create a connected transport/publisher pair.
    pub fn new() -> (Self, QueuePublisher) {
        let (sender, receiver) = unbounded();
        (
            Self {
                receiver,
                reject: None,
            },
            QueuePublisher { sender },
        )
    }

    /// Make the subscription handshake fail with `message`.
    #[must_use]
    pub fn rejecting(mut self, message: impl Into<String>) -> Self {
        self.reject = Some(message.into());
        self
    }
}

impl RealtimeTransport for QueueTransport {
    fn subscribe(&mut self, channel: &str) -> Result<(), TransportError> {
        match &self.reject {
            Some(message) => Err(TransportError {
                channel: channel.to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn poll(&mut self, timeout: Duration) -> TransportPoll {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => TransportPoll::Event(event),
            Err(RecvTimeoutError::Timeout) => TransportPoll::Idle,
            Err(RecvTimeoutError::Disconnected) => TransportPoll::Closed,
        }
    }
}

impl QueuePublisher {
    /// Publish an event. Returns `false` once the transport is gone.
    pub fn publish(&self, name: impl Into<String>, data: Value) -> bool {
        self.sender.send(RawEvent::new(name, data)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queue_transport_roundtrip() {
        let (mut transport, publisher) = QueueTransport::new();
        assert!(transport.subscribe("liveblog-1").is_ok());
        assert_eq!(transport.poll(Duration::from_millis(1)), TransportPoll::Idle);

        assert!(publisher.publish("add", json!({ "id": 1 })));
        assert!(matches!(
            transport.poll(Duration::from_millis(100)),
            TransportPoll::Event(ref e) if e.name == "add"
        ));

        drop(publisher);
        assert_eq!(transport.poll(Duration::from_millis(1)), TransportPoll::Closed);
    }

    #[test]
    fn test_queue_transport_rejects() {
        let (transport, _publisher) = QueueTransport::new();
        let mut transport = transport.rejecting("bad key");
        let err = transport.subscribe("liveblog-1").unwrap_err();
        assert_eq!(err.channel, "liveblog-1");
    }
}
