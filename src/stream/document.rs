//! Document: The presentation collaborator the stream renders into.

use crate::anchor::ScrollContainer;
use crate::layout::{NodeId, Viewport};
use crate::post::Post;

/// A scrolling document that materializes posts as nodes.
///
/// Content is trusted markup; documents render it as-is.
pub trait Document: ScrollContainer {
    /// Materialize `post` at list position `index` and return its node.
    fn mount(&mut self, index: usize, post: &Post) -> NodeId;

    /// Re-render `node` with the content of `post`.
    fn update(&mut self, node: NodeId, post: &Post);

    /// Remove every post node.
    fn clear(&mut self);

    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// Apply a new viewport size, re-laying out nodes as needed.
    fn resize(&mut self, viewport: Viewport);
}
