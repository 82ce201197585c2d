//! Error types for the feed engine.
//!
//! No failure here is fatal: each one means "this update did not apply"
//! and the rendered sequence stays as it was.

use crate::post::LibraryId;
use thiserror::Error;

/// A page request failed or returned something that is not a page.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The backend could not be reached or answered with an error.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Backend-provided description.
        message: String,
    },

    /// The response body was not a valid page document.
    #[error("malformed page from {url}: {source}")]
    Malformed {
        /// Requested URL.
        url: String,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },

    /// The fetch actor is gone, so the request was never issued.
    #[error("fetch actor disconnected")]
    Disconnected,
}

/// A realtime payload that does not have the shape of a post.
#[derive(Error, Debug)]
#[error("malformed realtime `{event}` event: {reason}")]
pub struct MalformedRealtimeEvent {
    /// Event name as delivered by the channel.
    pub event: String,
    /// Why the payload was rejected.
    pub reason: String,
}

/// One library could not be loaded by the asset runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to load library {library}: {message}")]
pub struct AssetLoadError {
    /// The library that failed.
    pub library: LibraryId,
    /// Runtime-provided description.
    pub message: String,
}

/// The realtime subscription handshake failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("subscription to channel {channel} failed: {message}")]
pub struct TransportError {
    /// Channel name.
    pub channel: String,
    /// Transport-provided description.
    pub message: String,
}

/// Umbrella error for the session surface.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Page fetch failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Realtime payload failure.
    #[error(transparent)]
    MalformedEvent(#[from] MalformedRealtimeEvent),

    /// Library load failure.
    #[error(transparent)]
    AssetLoad(#[from] AssetLoadError),

    /// Realtime subscription failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Settings could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(#[source] serde_json::Error),

    /// A worker thread could not be started.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Thread name.
        name: &'static str,
        /// OS error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
