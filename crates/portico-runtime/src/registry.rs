//! Backing type system.
//!
//! The [`TypeRegistry`] tracks the qualified names of every loaded synthesized
//! type. A name can be loaded at most once until it is released again.
//!
//! # Thread Safety
//!
//! The registry is `Send + Sync`; all access goes through a single
//! `parking_lot::Mutex`, so concurrent realizations of the same fixed name
//! cannot both succeed.
//!
//! # Scope
//!
//! Each [`Realizer`](crate::Realizer) gets its own registry unless one is
//! shared explicitly. [`TypeRegistry::global`] returns the process-wide
//! registry for callers that need names to be unique across realizers.

use parking_lot::Mutex;
use portico_core::{PorticoError, PorticoResult};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

/// Registry of loaded type names.
#[derive(Default)]
pub struct TypeRegistry {
    loaded: Mutex<HashSet<String>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry, created on first use.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(Self::new())))
    }

    /// Loads a qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`PorticoError::Realization`] if the name is blank or already
    /// loaded.
    pub fn register(&self, qualified_name: &str) -> PorticoResult<()> {
        if qualified_name.trim().is_empty() {
            return Err(PorticoError::realization(
                qualified_name,
                "qualified name must not be blank",
            ));
        }
        if !self.loaded.lock().insert(qualified_name.to_string()) {
            return Err(PorticoError::realization(
                qualified_name,
                "name already in use",
            ));
        }
        Ok(())
    }

    /// Releases a qualified name. Returns `false` if it was not loaded.
    pub fn unregister(&self, qualified_name: &str) -> bool {
        self.loaded.lock().remove(qualified_name)
    }

    /// Returns `true` if the name is loaded.
    #[must_use]
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.loaded.lock().contains(qualified_name)
    }

    /// Returns the loaded names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.loaded.lock().iter().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of loaded types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded.lock().len()
    }

    /// Returns `true` if no type is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded.lock().is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("loaded", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_register_and_unregister() {
        let registry = TypeRegistry::new();
        registry.register("X.Y.Z").unwrap();

        assert!(registry.contains("X.Y.Z"));
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister("X.Y.Z"));
        assert!(!registry.unregister("X.Y.Z"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_global_is_one_registry() {
        let name = "portico.registry.GlobalOnce";
        let registry = TypeRegistry::global();
        assert!(Arc::ptr_eq(&registry, &TypeRegistry::global()));

        registry.register(name).unwrap();
        assert!(TypeRegistry::global().register(name).is_err());
        assert!(TypeRegistry::global().unregister(name));
    }

    #[test]
    fn test_collision() {
        let registry = TypeRegistry::new();
        registry.register("X.Y.Z").unwrap();

        let err = registry.register("X.Y.Z").unwrap_err();
        assert!(matches!(err, PorticoError::Realization { .. }));
        assert!(err.to_string().contains("already in use"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_blank_name_rejected() {
        let registry = TypeRegistry::new();
        assert!(registry.register("  ").is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_registration_of_one_name() {
        let registry = Arc::new(TypeRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.register("shared.Name").is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
    }

    #[test]
    fn test_names_sorted() {
        let registry = TypeRegistry::new();
        registry.register("b.B").unwrap();
        registry.register("a.A").unwrap();
        assert_eq!(registry.names(), ["a.A", "b.B"]);
    }
}
