//! Viewport trigger: Decide when the tail of the stream has come into view.

use crate::layout::{Rect, Viewport};
use crate::pagination::PaginationCursor;
use crate::stream::{Document, StreamState};

/// Whether the top-left corner of `rect` lies inside the viewport.
///
/// This is cheaper and a little more eager than a full intersection test:
/// a node counts as visible as soon as its top edge scrolls into view.
pub const fn is_in_viewport(rect: Rect, viewport: Viewport) -> bool {
    rect.top() >= 0
        && rect.left() >= 0
        && rect.top() <= viewport.height
        && rect.left() <= viewport.width
}

/// Whether the last rendered post is in view.
pub fn last_post_visible<D>(document: &D, stream: &StreamState) -> bool
where
    D: Document + ?Sized,
{
    stream
        .last_node()
        .and_then(|node| document.node_rect(node))
        .is_some_and(|rect| is_in_viewport(rect, document.viewport()))
}

/// Whether a scroll or resize should start the next page fetch.
pub fn should_load_more<D>(document: &D, stream: &StreamState, cursor: &PaginationCursor) -> bool
where
    D: Document + ?Sized,
{
    cursor.should_fetch(last_post_visible(document, stream))
}
