//! In-memory collaborators.
//!
//! The engine talks to its surroundings through traits. This module has
//! small, fully working implementations of each one:
//!
//! - [`TextDocument`]: a [`Document`](crate::stream::Document) that wraps post text to the viewport
//! - [`RecordingRuntime`]: an [`AssetRuntime`](crate::asset::AssetRuntime) that records calls
//! - [`MemoryBackend`]: a [`FeedBackend`](crate::actor::FeedBackend) with canned responses

mod backend;
mod runtime;
mod text;

pub use backend::MemoryBackend;
pub use runtime::RecordingRuntime;
pub use text::{TextDocument, TextMetrics};
