//! Asset loader: Load-once libraries, then commands, then the after hook.

use super::registry::LibraryRegistry;
use super::runtime::{AssetRuntime, AssetScope};
use crate::error::AssetLoadError;
use crate::post::{dedup_libraries, Command, Library, LibraryId, Page, Post};
use tracing::{debug, warn};

/// Libraries and commands to apply together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetBundle {
    /// Libraries, first occurrence wins.
    pub libraries: Vec<Library>,
    /// Commands in execution order.
    pub commands: Vec<Command>,
}

impl AssetBundle {
    /// Assets declared by a single post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            libraries: post.libraries.clone(),
            commands: post.commands.clone(),
        }
    }

    /// Assets declared by a page envelope only.
    pub fn from_page(page: &Page) -> Self {
        Self {
            libraries: page.libraries.clone(),
            commands: page.commands.clone(),
        }
    }

    /// Merge another bundle into this one.
    pub fn union(&mut self, other: Self) {
        self.libraries.extend(other.libraries);
        self.libraries = dedup_libraries(std::mem::take(&mut self.libraries));
        self.commands.extend(other.commands);
    }

    /// Check if there is nothing to load or run.
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty() && self.commands.is_empty()
    }
}

/// Outcome of one [`AssetLoader::handle`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReport {
    /// Libraries loaded by this call.
    pub loaded: Vec<LibraryId>,
    /// Libraries skipped because they were already loaded.
    pub skipped: Vec<LibraryId>,
    /// Libraries that failed to load.
    pub failed: Vec<AssetLoadError>,
    /// Number of commands handed to the runtime.
    pub commands: usize,
}

impl AssetReport {
    /// Whether every library loaded (or was already present).
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives an [`AssetRuntime`] with a session-owned [`LibraryRegistry`].
pub struct AssetLoader<R> {
    runtime: R,
    registry: LibraryRegistry,
}

impl<R: AssetRuntime> AssetLoader<R> {
    /// Create a loader with an empty registry.
    pub fn new(runtime: R) -> Self {
        Self::with_registry(runtime, LibraryRegistry::new())
    }

    /// Create a loader with an injected registry.
    pub const fn with_registry(runtime: R, registry: LibraryRegistry) -> Self {
        Self { runtime, registry }
    }

    /// Load missing libraries, run commands, then call the after hook on `scope`.
    ///
    /// A failed library is reported and not recorded, so a later post that
    /// declares it tries again. Commands run regardless of failures.
    pub fn handle(&mut self, bundle: &AssetBundle, scope: AssetScope) -> AssetReport {
        let mut report = AssetReport::default();

        for library in &bundle.libraries {
            if self.registry.contains(&library.id) {
                report.skipped.push(library.id.clone());
                continue;
            }
            match self.runtime.load_library(library) {
                Ok(()) => {
                    debug!(library = %library.id, "library loaded");
                    self.registry.mark_loaded(library.id.clone());
                    report.loaded.push(library.id.clone());
                }
                Err(err) => {
                    warn!(library = %library.id, error = %err, "library failed to load");
                    report.failed.push(err);
                }
            }
        }

        if !bundle.commands.is_empty() {
            self.runtime.execute_commands(&bundle.commands);
            report.commands = bundle.commands.len();
        }

        self.runtime.after_loading(scope);
        report
    }

    /// The registry of loaded libraries.
    pub const fn registry(&self) -> &LibraryRegistry {
        &self.registry
    }

    /// Borrow the runtime.
    pub const fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Mutably borrow the runtime.
    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }
}
