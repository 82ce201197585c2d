//! Viewport: The visible window onto the scrolling document.

/// Size of the visible area, in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Viewport {
    /// Visible width.
    pub width: i32,
    /// Visible height.
    pub height: i32,
}

impl Viewport {
    /// Create a new viewport.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}
