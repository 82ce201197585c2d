//! Scroll anchoring: Keep the reader's place across content-height changes.
//!
//! Before a mutation the anchor records where a reference node sits on
//! screen; afterwards it shifts the container's scroll offset by however
//! far that node moved, so the node appears not to have moved at all.
//!
//! ```ignore
//! let inserted = anchored(&mut document, first_node, Direction::Up, |doc| {
//!     doc.mount(0, &post)
//! });
//! ```

mod scroll_anchor;

pub use scroll_anchor::{anchored, Direction, ScrollAnchor, ScrollContainer};
