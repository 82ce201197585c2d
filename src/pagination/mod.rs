//! Pagination: Fetching older history as the reader scrolls down.

mod cursor;

pub use cursor::{PaginationCursor, CURSOR_PLACEHOLDER};
