//! Post model: Entries, their assets and the page envelope.
//!
//! Everything here is decoded from the backend's JSON. Ids and timestamps
//! tolerate both numbers and numeric strings; libraries tolerate both the
//! flat id list and the grouped `library -> assets` map.

#[allow(clippy::module_inception)]
mod post;
mod page;

pub use page::Page;
pub use post::{Command, Created, Library, LibraryId, Post, PostId};
pub(crate) use post::dedup_libraries;
