//! Session: Main coordinator that ties the stream to its event sources.
//!
//! The session is the entry point for hosts. It owns all stream state,
//! spawns the fetch and channel actors, and applies every event on the
//! thread that calls [`Session::handle`], [`Session::poll`] or
//! [`Session::wait`].

use super::channel::ChannelActor;
use super::fetcher::{FeedBackend, FetchActor};
use super::messages::{FetchKind, FetchRequest, SessionEvent};
use crate::asset::{AssetBundle, AssetLoader, AssetRuntime};
use crate::error::{FeedError, FeedResult, FetchError};
use crate::pagination::PaginationCursor;
use crate::post::Page;
use crate::realtime::{ConnectionState, RealtimeIngestion, RealtimeTransport};
use crate::stream::{Document, Mutation, StreamState};
use crate::viewport::{should_load_more, ViewportListener};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use serde::{Deserialize, Deserializer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for a [`Session`].
///
/// Deserializable from the settings object the host page embeds; the
/// `getURL`/`getNextURL` aliases match the names the reader widget uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// URL of the first page.
    #[serde(alias = "getURL")]
    pub feed_url: String,
    /// Next-page URL template; `%s` is replaced by the cursor.
    #[serde(alias = "getNextURL")]
    pub next_page_url: String,
    /// Realtime channel name.
    pub channel: String,
    /// How long the channel actor waits per poll before checking shutdown.
    #[serde(rename = "event_poll_timeout_ms", deserialize_with = "deserialize_millis")]
    pub event_poll_timeout: Duration,
    /// Trace every raw realtime delivery.
    pub debug_transport: bool,
    /// Capacity of the session event queue.
    pub event_queue_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            feed_url: String::new(),
            next_page_url: String::new(),
            channel: String::new(),
            event_poll_timeout: Duration::from_millis(50),
            debug_transport: false,
            event_queue_capacity: 256,
        }
    }
}

impl SessionConfig {
    /// Decode settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] when the JSON does not match.
    pub fn from_json(json: &str) -> FeedResult<Self> {
        serde_json::from_str(json).map_err(FeedError::Config)
    }

    /// Channel name the publisher uses for a given liveblog.
    pub fn channel_for(liveblog_id: impl std::fmt::Display) -> String {
        format!("liveblog-{liveblog_id}")
    }
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

/// What handling one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// The stream was (or deliberately was not) mutated.
    Stream(Mutation),
    /// A fetch was issued.
    FetchStarted(FetchKind),
    /// The realtime channel is subscribed.
    Connected,
    /// The realtime channel is gone.
    Disconnected,
    /// Nothing to do for this event.
    Ignored,
}

/// A live reading session over one liveblog.
pub struct Session<D, R> {
    /// Configuration.
    config: SessionConfig,
    /// Presentation collaborator.
    document: D,
    /// Asset loader with its session registry.
    assets: AssetLoader<R>,
    /// Merged post sequence.
    stream: StreamState,
    /// Pull-side guards.
    cursor: PaginationCursor,
    /// Push-side state machine.
    realtime: RealtimeIngestion,
    /// Whether the first page has been applied.
    initialized: bool,
    /// Whether the first page request is outstanding.
    initial_in_flight: bool,
    /// Event queue.
    events_rx: Receiver<SessionEvent>,
    events_tx: Sender<SessionEvent>,
    /// Cleared on teardown to detach every listener.
    listener_attached: Arc<AtomicBool>,
    /// Actor handles.
    fetcher: Option<FetchActor>,
    channel: Option<ChannelActor>,
}

impl<D: Document, R: AssetRuntime> Session<D, R> {
    /// Start a session: spawn the actors and request the first page.
    ///
    /// Without a transport the session is pull-only.
    ///
    /// # Errors
    ///
    /// Returns an error if an actor thread cannot be spawned or the first
    /// request cannot be queued.
    pub fn start(
        config: SessionConfig,
        backend: Arc<dyn FeedBackend>,
        transport: Option<Box<dyn RealtimeTransport>>,
        document: D,
        assets: AssetLoader<R>,
    ) -> FeedResult<Self> {
        let (events_tx, events_rx) = bounded(config.event_queue_capacity.max(1));

        let fetcher = FetchActor::spawn(backend, events_tx.clone())?;
        let channel = match transport {
            Some(transport) => Some(ChannelActor::spawn(
                transport,
                config.channel.clone(),
                config.event_poll_timeout,
                events_tx.clone(),
            )?),
            None => None,
        };

        let mut session = Self {
            realtime: RealtimeIngestion::new(config.debug_transport),
            config,
            document,
            assets,
            stream: StreamState::new(),
            cursor: PaginationCursor::new(),
            initialized: false,
            initial_in_flight: false,
            events_rx,
            events_tx,
            listener_attached: Arc::new(AtomicBool::new(true)),
            fetcher: Some(fetcher),
            channel,
        };
        session.request_initial()?;
        info!(feed = %session.config.feed_url, channel = %session.config.channel, "session started");
        Ok(session)
    }

    /// A handle for the host's scroll and resize callbacks.
    pub fn listener(&self) -> ViewportListener {
        ViewportListener::new(self.events_tx.clone(), self.listener_attached.clone())
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Returns the failure of this one update; the stream is left intact and
    /// the session keeps running.
    pub fn handle(&mut self, event: SessionEvent) -> FeedResult<Update> {
        match event {
            SessionEvent::Scroll => self.on_viewport_change(),
            SessionEvent::Resize(viewport) => {
                debug!(?viewport, "viewport resized");
                self.document.resize(viewport);
                self.on_viewport_change()
            }
            SessionEvent::PageFetched { kind, result } => self.on_page_fetched(kind, result),
            SessionEvent::Subscribed => {
                self.realtime.on_subscribed(&self.config.channel);
                Ok(Update::Connected)
            }
            SessionEvent::SubscribeFailed(err) => {
                warn!(error = %err, "realtime subscription failed");
                self.realtime.on_disconnected();
                Err(err.into())
            }
            SessionEvent::Realtime(raw) => {
                let applied = self.realtime.ingest(
                    &raw,
                    &mut self.stream,
                    &mut self.document,
                    &mut self.assets,
                )?;
                Ok(applied.map_or(Update::Ignored, Update::Stream))
            }
            SessionEvent::Disconnected => {
                self.realtime.on_disconnected();
                Ok(Update::Disconnected)
            }
        }
    }

    /// Apply the next queued event, if any (non-blocking).
    pub fn poll(&mut self) -> Option<FeedResult<Update>> {
        match self.events_rx.try_recv() {
            Ok(event) => Some(self.handle(event)),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next event and apply it (blocking with timeout).
    pub fn wait(&mut self, timeout: Duration) -> Option<FeedResult<Update>> {
        let event = self.events_rx.recv_timeout(timeout).ok()?;
        Some(self.handle(event))
    }

    /// Apply every queued event.
    pub fn drain(&mut self) -> Vec<FeedResult<Update>> {
        let mut updates = Vec::new();
        while let Some(update) = self.poll() {
            updates.push(update);
        }
        updates
    }

    /// Get the merged stream.
    pub const fn stream(&self) -> &StreamState {
        &self.stream
    }

    /// Get the pagination cursor.
    pub const fn cursor(&self) -> &PaginationCursor {
        &self.cursor
    }

    /// Get the document.
    pub const fn document(&self) -> &D {
        &self.document
    }

    /// Get a mutable reference to the document (to scroll it, for instance).
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Get the asset loader.
    pub const fn assets(&self) -> &AssetLoader<R> {
        &self.assets
    }

    /// Realtime subscription state.
    pub const fn connection_state(&self) -> ConnectionState {
        self.realtime.state()
    }

    /// Get the configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Tear the session down, releasing the listener and both actors.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn on_viewport_change(&mut self) -> FeedResult<Update> {
        if !self.initialized {
            if self.initial_in_flight {
                return Ok(Update::Ignored);
            }
            // The first load failed earlier; a scroll retries it.
            self.request_initial()?;
            return Ok(Update::FetchStarted(FetchKind::Initial));
        }

        if !should_load_more(&self.document, &self.stream, &self.cursor) {
            return Ok(Update::Ignored);
        }
        let Some(url) = self.cursor.next_page_url(&self.config.next_page_url) else {
            return Ok(Update::Ignored);
        };
        if !self.cursor.begin_fetch() {
            return Ok(Update::Ignored);
        }

        debug!(%url, "requesting next page");
        if let Err(err) = self.send_request(FetchKind::NextPage, url) {
            self.cursor.on_fetch_failed(&err);
            return Err(err.into());
        }
        Ok(Update::FetchStarted(FetchKind::NextPage))
    }

    fn on_page_fetched(&mut self, kind: FetchKind, result: Result<Page, FetchError>) -> FeedResult<Update> {
        match (kind, result) {
            (FetchKind::Initial, Ok(page)) => {
                self.initial_in_flight = false;
                self.initialized = true;
                let envelope = AssetBundle::from_page(&page);
                let mutation = self.stream.initialize(
                    page.content,
                    envelope,
                    &mut self.document,
                    &mut self.assets,
                );
                self.cursor.track(&self.stream);
                Ok(Update::Stream(mutation))
            }
            (FetchKind::Initial, Err(err)) => {
                self.initial_in_flight = false;
                warn!(error = %err, "initial load failed");
                Err(err.into())
            }
            (FetchKind::NextPage, Ok(page)) => {
                let mutation = self.cursor.on_page_loaded(
                    page,
                    &mut self.stream,
                    &mut self.document,
                    &mut self.assets,
                );
                Ok(Update::Stream(mutation))
            }
            (FetchKind::NextPage, Err(err)) => {
                self.cursor.on_fetch_failed(&err);
                Err(err.into())
            }
        }
    }

    fn request_initial(&mut self) -> FeedResult<()> {
        let url = self.config.feed_url.clone();
        self.send_request(FetchKind::Initial, url)?;
        self.initial_in_flight = true;
        Ok(())
    }

    fn send_request(&self, kind: FetchKind, url: String) -> Result<(), FetchError> {
        self.fetcher
            .as_ref()
            .ok_or(FetchError::Disconnected)?
            .request(FetchRequest { kind, url })
    }
}

impl<D, R> Session<D, R> {
    fn teardown(&mut self) {
        self.listener_attached.store(false, Ordering::Release);

        if let Some(channel) = self.channel.take() {
            channel.join();
        }
        // The fetch worker may be stuck inside a backend call that never
        // returns; signal it and let it exit on its own.
        if let Some(fetcher) = self.fetcher.take() {
            fetcher.shutdown();
        }
    }
}

impl<D, R> Drop for Session<D, R> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_from_json() {
        let config = SessionConfig::from_json(
            &json!({
                "getURL": "/liveblog/7/posts",
                "getNextURL": "/liveblog/7/posts/%s",
                "channel": "liveblog-7",
                "event_poll_timeout_ms": 25,
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(config.feed_url, "/liveblog/7/posts");
        assert_eq!(config.next_page_url, "/liveblog/7/posts/%s");
        assert_eq!(config.event_poll_timeout, Duration::from_millis(25));
        assert!(!config.debug_transport);
        assert_eq!(config.event_queue_capacity, 256);
    }

    #[test]
    fn test_config_rejects_bad_types() {
        let err = SessionConfig::from_json(r#"{"debug_transport": "yes"}"#).unwrap_err();
        assert!(matches!(err, FeedError::Config(_)));
    }

    #[test]
    fn test_channel_naming() {
        assert_eq!(SessionConfig::channel_for(42), "liveblog-42");
    }
}
