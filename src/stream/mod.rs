//! Stream: The single source of truth for what the reader sees.
//!
//! [`StreamState`] owns the ordered post sequence. Three mutations feed it:
//!
//! - **prepend**: a realtime `add`, inserted at the head under a scroll anchor
//! - **append page**: an older page from pagination, added at the tail
//! - **replace**: a realtime `edit`, swapped in place under a scroll anchor
//!
//! Each one is idempotent by post id, so pull and push updates may interleave
//! in any order without corrupting the sequence.

mod document;
mod state;

pub use document::Document;
pub use state::{Mutation, StreamState};
