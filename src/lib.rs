//! # Liveblog Stream
//!
//! The reconciliation engine behind a liveblog reader.
//!
//! A liveblog is a growing, newest-first feed of short posts. The reader
//! sees it through two independent sources at once: older pages pulled in
//! as they scroll down, and new or edited posts pushed over a realtime
//! channel. This crate keeps one de-duplicated, ordered sequence consistent
//! across both, without moving the reader's place on screen.
//!
//! ## Core Concepts
//!
//! - **Stream state**: the single ordered sequence; every mutation is idempotent by id
//! - **Pagination cursor**: timestamp cursor with an in-flight guard and end-of-history flag
//! - **Realtime ingestion**: one prepend per `add`, one replace per `edit`
//! - **Scroll anchor**: before/after measurement around each insertion above the view
//! - **Asset loader**: load-once libraries and post-render commands for new content
//! - **Actor model**: fetches and realtime deliveries arrive from worker threads
//!   and are applied on one session thread
//!
//! ## Example
//!
//! ```rust,ignore
//! use liveblog::{AssetLoader, MemoryBackend, RecordingRuntime, Session, SessionConfig, TextDocument, Viewport};
//! use std::sync::Arc;
//!
//! let config = SessionConfig {
//!     feed_url: "/liveblog/7/posts".into(),
//!     next_page_url: "/liveblog/7/posts/%s".into(),
//!     ..SessionConfig::default()
//! };
//! let backend = Arc::new(MemoryBackend::new());
//! let mut session = Session::start(
//!     config,
//!     backend,
//!     None,
//!     TextDocument::new(Viewport::new(800, 600)),
//!     AssetLoader::new(RecordingRuntime::new()),
//! )?;
//! session.wait(std::time::Duration::from_secs(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod anchor;
pub mod asset;
pub mod error;
pub mod host;
pub mod layout;
pub mod pagination;
pub mod post;
pub mod realtime;
pub mod stream;
pub mod viewport;

// Re-exports for convenience
pub use actor::{FeedBackend, FetchKind, Session, SessionConfig, SessionEvent, Update};
pub use anchor::{anchored, Direction, ScrollAnchor, ScrollContainer};
pub use asset::{AssetBundle, AssetLoader, AssetReport, AssetRuntime, AssetScope, LibraryRegistry};
pub use error::{AssetLoadError, FeedError, FeedResult, FetchError, MalformedRealtimeEvent, TransportError};
pub use host::{MemoryBackend, RecordingRuntime, TextDocument};
pub use layout::{NodeId, Rect, Viewport};
pub use pagination::PaginationCursor;
pub use post::{Command, Created, Library, LibraryId, Page, Post, PostId};
pub use realtime::{ConnectionState, QueuePublisher, QueueTransport, RawEvent, RealtimeEvent, RealtimeTransport};
pub use stream::{Document, Mutation, StreamState};
pub use viewport::ViewportListener;
