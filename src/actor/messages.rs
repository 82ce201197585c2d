//! Message types for actor communication.
//!
//! These enums define the protocol between the worker threads and the
//! session's event loop.

use crate::error::{FetchError, TransportError};
use crate::layout::Viewport;
use crate::post::Page;
use crate::realtime::RawEvent;
use crossbeam_channel::{SendTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Which endpoint a fetch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// The first page, from the feed URL.
    Initial,
    /// An older page, from the next-page URL template.
    NextPage,
}

/// A request handed to the fetch actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Endpoint kind.
    pub kind: FetchKind,
    /// Fully substituted URL.
    pub url: String,
}

/// Events consumed by the session loop.
///
/// Every mutation of the stream happens in response to one of these.
#[derive(Debug)]
pub enum SessionEvent {
    /// The reader scrolled.
    Scroll,

    /// The viewport was resized.
    Resize(Viewport),

    /// A fetch finished.
    PageFetched {
        /// Which endpoint was fetched.
        kind: FetchKind,
        /// Decoded page or failure.
        result: Result<Page, FetchError>,
    },

    /// The realtime channel subscription succeeded.
    Subscribed,

    /// The realtime channel subscription failed.
    SubscribeFailed(TransportError),

    /// A realtime delivery.
    Realtime(RawEvent),

    /// The realtime transport closed.
    Disconnected,
}

/// Send `event` to the session, retrying every `retry` until it is accepted
/// or `shutdown` is raised.
///
/// Returns `false` when the event was not delivered; the worker should exit.
pub(super) fn deliver(
    events: &Sender<SessionEvent>,
    mut event: SessionEvent,
    retry: Duration,
    shutdown: &AtomicBool,
) -> bool {
    loop {
        if shutdown.load(Ordering::Relaxed) {
            return false;
        }
        match events.send_timeout(event, retry) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(pending)) => event = pending,
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}
