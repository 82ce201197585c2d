//! Channel Actor: Dedicated thread for the realtime subscription.
//!
//! Subscribes once, then polls the transport and forwards every delivery
//! to the session loop until shutdown or until the transport closes.

use super::messages::{deliver, SessionEvent};
use crate::error::FeedError;
use crate::realtime::{RealtimeTransport, TransportPoll};
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Channel actor that owns the realtime transport.
pub struct ChannelActor {
    /// Handle to the channel thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl ChannelActor {
    /// Spawn the channel actor thread.
    ///
    /// # Arguments
    ///
    /// * `transport` - The realtime client; moved into the thread.
    /// * `channel` - Channel name to subscribe to.
    /// * `poll_timeout` - How long to wait for a delivery before checking shutdown.
    /// * `events` - Session event queue.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Spawn`] if the OS refuses to start the thread.
    pub fn spawn(
        transport: Box<dyn RealtimeTransport>,
        channel: String,
        poll_timeout: Duration,
        events: Sender<SessionEvent>,
    ) -> Result<Self, FeedError> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("liveblog-channel".to_string())
            .spawn(move || {
                Self::run_loop(transport, &channel, poll_timeout, &events, &shutdown_clone);
            })
            .map_err(|source| FeedError::Spawn {
                name: "liveblog-channel",
                source,
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the channel thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the channel thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Subscribe, then forward deliveries.
    fn run_loop(
        mut transport: Box<dyn RealtimeTransport>,
        channel: &str,
        poll_timeout: Duration,
        events: &Sender<SessionEvent>,
        shutdown: &AtomicBool,
    ) {
        if let Err(err) = transport.subscribe(channel) {
            deliver(events, SessionEvent::SubscribeFailed(err), poll_timeout, shutdown);
            return;
        }
        if !deliver(events, SessionEvent::Subscribed, poll_timeout, shutdown) {
            return;
        }

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            match transport.poll(poll_timeout) {
                TransportPoll::Event(event) => {
                    // A full queue must not outlive shutdown
                    if !deliver(events, SessionEvent::Realtime(event), poll_timeout, shutdown) {
                        break;
                    }
                }
                TransportPoll::Idle => {
                    // No delivery, continue loop (will check shutdown)
                }
                TransportPoll::Closed => {
                    debug!(channel, "transport closed");
                    deliver(events, SessionEvent::Disconnected, poll_timeout, shutdown);
                    break;
                }
            }
        }
    }
}

impl Drop for ChannelActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::QueueTransport;
    use crossbeam_channel::{bounded, unbounded};
    use serde_json::json;

    #[test]
    fn test_channel_actor_forwards() {
        let (transport, publisher) = QueueTransport::new();
        let (tx, rx) = unbounded();
        let actor = ChannelActor::spawn(
            Box::new(transport),
            "liveblog-1".to_string(),
            Duration::from_millis(10),
            tx,
        )
        .unwrap();

        assert!(matches!(rx.recv_timeout(Duration::from_secs(2)), Ok(SessionEvent::Subscribed)));
        publisher.publish("add", json!({ "id": 1, "created": 1 }));
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok(SessionEvent::Realtime(ref e)) if e.name == "add"
        ));

        drop(publisher);
        assert!(matches!(rx.recv_timeout(Duration::from_secs(2)), Ok(SessionEvent::Disconnected)));
        actor.join();
    }

    #[test]
    fn test_channel_actor_joins_with_full_queue() {
        let (transport, publisher) = QueueTransport::new();
        let (tx, rx) = bounded(1);
        let actor = ChannelActor::spawn(
            Box::new(transport),
            "liveblog-1".to_string(),
            Duration::from_millis(10),
            tx,
        )
        .unwrap();

        for id in 0..10 {
            publisher.publish("add", json!({ "id": id, "created": id }));
        }
        // Let the actor fill the queue and stall on the next delivery.
        thread::sleep(Duration::from_millis(100));
        assert!(rx.is_full());

        let (done_tx, done_rx) = unbounded();
        thread::spawn(move || {
            actor.join();
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(3)).is_ok());
        drop(rx);
    }

    #[test]
    fn test_channel_actor_subscribe_failure() {
        let (transport, _publisher) = QueueTransport::new();
        let (tx, rx) = unbounded();
        let actor = ChannelActor::spawn(
            Box::new(transport.rejecting("invalid key")),
            "liveblog-1".to_string(),
            Duration::from_millis(10),
            tx,
        )
        .unwrap();

        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok(SessionEvent::SubscribeFailed(_))
        ));
        actor.join();
    }
}
