//! Layout module: Pixel geometry shared by the anchor and viewport code.
//!
//! All rectangles are expressed relative to the viewport's top-left corner,
//! the way a bounding client rect is.

mod node;
mod rect;
mod viewport;

pub use node::NodeId;
pub use rect::Rect;
pub use viewport::Viewport;
