//! Asset loading: Libraries and post-render commands attached to posts.
//!
//! Every insertion into the stream ends with one call to
//! [`AssetLoader::handle`], which:
//!
//! 1. loads each declared library not yet in the [`LibraryRegistry`],
//! 2. hands the commands to the [`AssetRuntime`] in order,
//! 3. calls the runtime's after-loading hook for the affected subtree.
//!
//! Library failures are reported in the [`AssetReport`] and never stop
//! the remaining steps.

mod loader;
mod registry;
mod runtime;

pub use loader::{AssetBundle, AssetLoader, AssetReport};
pub use registry::LibraryRegistry;
pub use runtime::{AssetRuntime, AssetScope};
