//! Actor Model: Message-passing concurrency for the feed session.
//!
//! This module implements a simple actor system using crossbeam channels:
//! - **Fetch Actor**: Performs backend page requests, forwards decoded pages
//! - **Channel Actor**: Owns the realtime subscription, forwards deliveries
//! - **Session**: The single thread that mutates the stream
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   PageFetched    ┌──────────────┐
//! │ Fetch Thread │ ───────────────▶ │              │
//! └──────────────┘ ◀─────────────── │              │
//!                   FetchRequest    │   Session    │ ──▶ StreamState
//! ┌──────────────┐                  │   (single    │       │
//! │Channel Thread│ ───────────────▶ │    thread)   │       ▼
//! └──────────────┘  Realtime(add/   │              │   Document / Assets
//!                        edit)      │              │
//! ┌──────────────┐                  │              │
//! │ Host (scroll,│ ───────────────▶ │              │
//! │   resize)    │  Scroll/Resize   └──────────────┘
//! └──────────────┘
//! ```
//!
//! Completions from the workers may interleave in any order; every stream
//! operation is idempotent by post id, so they cannot corrupt the sequence.

mod channel;
mod fetcher;
mod messages;
mod session;

pub use channel::ChannelActor;
pub use fetcher::{FeedBackend, FetchActor};
pub use messages::{FetchKind, FetchRequest, SessionEvent};
pub use session::{Session, SessionConfig, Update};
