//! Recording runtime: An asset runtime that remembers what it was asked to do.

use crate::asset::{AssetRuntime, AssetScope};
use crate::error::AssetLoadError;
use crate::post::{Command, Library, LibraryId};
use std::collections::HashSet;

/// Asset runtime that records loads, commands and hooks in call order.
#[derive(Debug, Default, Clone)]
pub struct RecordingRuntime {
    /// Libraries successfully loaded.
    pub loaded: Vec<LibraryId>,
    /// Commands executed.
    pub commands: Vec<Command>,
    /// Scopes passed to the after-loading hook.
    pub after: Vec<AssetScope>,
    /// Libraries that fail to load.
    pub failing: HashSet<LibraryId>,
}

impl RecordingRuntime {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `library` fail whenever it is loaded.
    #[must_use]
    pub fn fail_on(mut self, library: impl Into<String>) -> Self {
        self.failing.insert(LibraryId::new(library));
        self
    }
}

impl AssetRuntime for RecordingRuntime {
    fn load_library(&mut self, library: &Library) -> Result<(), AssetLoadError> {
        if self.failing.contains(&library.id) {
            return Err(AssetLoadError {
                library: library.id.clone(),
                message: "library unavailable".to_string(),
            });
        }
        self.loaded.push(library.id.clone());
        Ok(())
    }

    fn execute_commands(&mut self, commands: &[Command]) {
        self.commands.extend_from_slice(commands);
    }

    fn after_loading(&mut self, scope: AssetScope) {
        self.after.push(scope);
    }
}
