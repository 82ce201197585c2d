//! Realtime ingestion: Turns channel deliveries into stream mutations.

use super::event::{RawEvent, RealtimeEvent};
use crate::asset::{AssetLoader, AssetRuntime};
use crate::error::MalformedRealtimeEvent;
use crate::stream::{Document, Mutation, StreamState};
use tracing::{debug, info, trace, warn};

/// Subscription state of the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// Not subscribed; deliveries are ignored.
    #[default]
    Disconnected,
    /// Subscribed; `add` and `edit` are applied.
    Connected,
}

/// Realtime ingestion state machine.
///
/// Events missed while disconnected are gone: there is no backfill.
#[derive(Debug, Default)]
pub struct RealtimeIngestion {
    state: ConnectionState,
    debug_transport: bool,
    applied: u64,
    dropped: u64,
}

impl RealtimeIngestion {
    /// Create a disconnected ingestion.
    pub fn new(debug_transport: bool) -> Self {
        Self {
            debug_transport,
            ..Self::default()
        }
    }

    /// The channel subscription succeeded.
    pub fn on_subscribed(&mut self, channel: &str) {
        info!(channel, "realtime channel subscribed");
        self.state = ConnectionState::Connected;
    }

    /// The channel went away.
    pub fn on_disconnected(&mut self) {
        if self.state == ConnectionState::Connected {
            warn!("realtime channel disconnected; events until resubscription are lost");
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Decode a delivery and apply it to the stream.
    ///
    /// Returns `Ok(None)` when disconnected or for events this engine does
    /// not consume. Every `add` performs exactly one prepend and every
    /// `edit` exactly one replace.
    ///
    /// # Errors
    ///
    /// A malformed payload is dropped and reported; the subscription is unaffected.
    pub fn ingest<D, R>(
        &mut self,
        raw: &RawEvent,
        stream: &mut StreamState,
        document: &mut D,
        assets: &mut AssetLoader<R>,
    ) -> Result<Option<Mutation>, MalformedRealtimeEvent>
    where
        D: Document + ?Sized,
        R: AssetRuntime,
    {
        if self.debug_transport {
            trace!(event = %raw.name, data = %raw.data, "realtime delivery");
        }
        if self.state != ConnectionState::Connected {
            debug!(event = %raw.name, "delivery while disconnected ignored");
            return Ok(None);
        }

        let event = match RealtimeEvent::parse(raw) {
            Ok(Some(event)) => event,
            Ok(None) => {
                debug!(event = %raw.name, "unhandled realtime event");
                return Ok(None);
            }
            Err(err) => {
                self.dropped += 1;
                warn!(error = %err, "realtime event dropped");
                return Err(err);
            }
        };

        self.applied += 1;
        let mutation = match event {
            RealtimeEvent::Add(post) => stream.prepend_one(post, document, assets),
            RealtimeEvent::Edit(post) => stream.replace_one(post, document, assets),
        };
        Ok(Some(mutation))
    }

    /// Current subscription state.
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Number of well-formed events applied.
    pub const fn applied(&self) -> u64 {
        self.applied
    }

    /// Number of malformed events dropped.
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}
