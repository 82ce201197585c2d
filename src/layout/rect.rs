//! Rect: A pixel rectangle relative to the viewport.

/// A rectangle defined by position and size, in CSS pixels.
///
/// The origin is the top-left corner of the viewport, so `y` becomes
/// negative once a node has scrolled above the visible area.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the left edge.
    pub x: i32,
    /// Y coordinate of the top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge.
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Left edge.
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10, -20, 100, 50);
        assert_eq!(rect.top(), -20);
        assert_eq!(rect.left(), 10);
        assert_eq!(format!("{rect:?}"), "Rect(10, -20 100x50)");
    }
}
