//! Library registry: Which libraries are already loaded in this page session.

use crate::post::LibraryId;
use std::collections::HashSet;

/// Session-scoped set of loaded library ids.
///
/// Created at session start and handed to the [`AssetLoader`](super::AssetLoader);
/// it is never a global.
#[derive(Debug, Default, Clone)]
pub struct LibraryRegistry {
    loaded: HashSet<LibraryId>,
}

impl LibraryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with libraries the host page already has.
    pub fn with_loaded<I: IntoIterator<Item = LibraryId>>(ids: I) -> Self {
        Self {
            loaded: ids.into_iter().collect(),
        }
    }

    /// Check whether a library has been loaded.
    pub fn contains(&self, id: &LibraryId) -> bool {
        self.loaded.contains(id)
    }

    /// Record a successful load. Returns `false` if it was already recorded.
    pub fn mark_loaded(&mut self, id: LibraryId) -> bool {
        self.loaded.insert(id)
    }

    /// Number of loaded libraries.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Check if nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_mark_once() {
        let mut registry = LibraryRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.mark_loaded(LibraryId::new("core/drupal")));
        assert!(!registry.mark_loaded(LibraryId::new("core/drupal")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_seeded() {
        let registry = LibraryRegistry::with_loaded([LibraryId::new("core/jquery")]);
        assert!(registry.contains(&LibraryId::new("core/jquery")));
        assert!(!registry.contains(&LibraryId::new("core/drupal")));
    }
}
