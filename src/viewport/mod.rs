//! Viewport: Scroll/resize observation that drives pagination.
//!
//! The host reports scrolls and resizes through a [`ViewportListener`]. On
//! each one the session asks [`should_load_more`] whether the last post has
//! entered the viewport and, if the cursor permits, starts the next fetch.

mod listener;
mod trigger;

pub use listener::ViewportListener;
pub use trigger::{is_in_viewport, last_post_visible, should_load_more};
