//! Asset runtime: The collaborator that actually loads scripts and runs commands.

use crate::error::AssetLoadError;
use crate::post::{Command, Library};
use crate::layout::NodeId;

/// Subtree the "after loading" hook is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetScope {
    /// The whole document.
    Document,
    /// A single rendered post node.
    Node(NodeId),
}

/// Script/resource runtime provided by the rendering layer.
///
/// The engine decides *what* to load and in which order; implementors
/// decide *how*.
pub trait AssetRuntime {
    /// Load one library.
    ///
    /// # Errors
    ///
    /// Returns an [`AssetLoadError`] when the library could not be loaded.
    fn load_library(&mut self, library: &Library) -> Result<(), AssetLoadError>;

    /// Execute post-render commands in the order given.
    fn execute_commands(&mut self, commands: &[Command]);

    /// Re-attach behaviours under `scope` once loading is done.
    fn after_loading(&mut self, scope: AssetScope);
}

impl<R: AssetRuntime + ?Sized> AssetRuntime for Box<R> {
    fn load_library(&mut self, library: &Library) -> Result<(), AssetLoadError> {
        (**self).load_library(library)
    }

    fn execute_commands(&mut self, commands: &[Command]) {
        (**self).execute_commands(commands);
    }

    fn after_loading(&mut self, scope: AssetScope) {
        (**self).after_loading(scope);
    }
}
