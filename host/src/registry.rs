//! Process-wide module registry
//!
//! The registry maps dotted module paths to module handles. Entries are
//! injected during initialization and live for the rest of the process;
//! there is no teardown. Re-aliasing a path to the object it already holds
//! is a no-op, which is what makes re-running the loader idempotent.
//!
//! # Thread Safety
//!
//! The registry is not thread-safe by itself. Initialization is a single
//! pass on whichever thread performs it first; wrap the owning
//! [`crate::import::ImportSystem`] in `Arc<Mutex<_>>` if independent
//! subsystems need to mutate it concurrently.

use std::collections::HashMap;

use sdk::errors::HostError;
use sdk::symbol::{same_module, ModuleHandle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::path::ModulePath;

/// What to do when an alias path is already bound to a different module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Replace the previous binding and log a warning (last writer wins)
    #[default]
    Overwrite,
    /// Refuse the alias with [`HostError::DuplicateAlias`]
    Reject,
}

/// Outcome of an alias insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasOutcome {
    /// The path was previously unbound
    Inserted,
    /// The path already held this exact module
    Unchanged,
    /// The path held a different module and was overwritten
    Replaced,
}

/// Mapping from dotted path to module handle
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    policy: DuplicatePolicy,
    modules: HashMap<ModulePath, ModuleHandle>,
}

impl ModuleRegistry {
    /// Create an empty registry with the given duplicate-alias policy
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            modules: HashMap::new(),
        }
    }

    /// The configured duplicate-alias policy
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Bind `module` under `path`.
    ///
    /// Aliasing a path to the module it already holds is always a silent
    /// no-op. Binding a different module follows the configured
    /// [`DuplicatePolicy`].
    pub fn alias(
        &mut self,
        path: ModulePath,
        module: ModuleHandle,
    ) -> Result<AliasOutcome, HostError> {
        match self.modules.get(&path) {
            None => {
                tracing::debug!("Registered module alias '{}'", path);
                self.modules.insert(path, module);
                Ok(AliasOutcome::Inserted)
            }
            Some(existing) if same_module(existing, &module) => {
                tracing::debug!("Alias '{}' already bound to the same module", path);
                Ok(AliasOutcome::Unchanged)
            }
            Some(_) => match self.policy {
                DuplicatePolicy::Overwrite => {
                    tracing::warn!(
                        "Alias '{}' already bound to a different module, overwriting",
                        path
                    );
                    self.modules.insert(path, module);
                    Ok(AliasOutcome::Replaced)
                }
                DuplicatePolicy::Reject => {
                    tracing::error!("Alias '{}' already bound to a different module", path);
                    Err(HostError::DuplicateAlias(path.to_string()))
                }
            },
        }
    }

    /// Resolve a path to its module handle.
    ///
    /// Every resolution of an aliased path returns a handle to the same
    /// underlying object, never a copy.
    pub fn resolve(&self, path: &ModulePath) -> Option<ModuleHandle> {
        self.modules.get(path).map(Arc::clone)
    }

    /// Whether a path is currently bound
    pub fn contains(&self, path: &ModulePath) -> bool {
        self.modules.contains_key(path)
    }

    /// All bound paths
    pub fn paths(&self) -> Vec<ModulePath> {
        self.modules.keys().cloned().collect()
    }

    /// Number of bound paths
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdk::symbol::Namespace;

    fn path(s: &str) -> ModulePath {
        ModulePath::parse(s).expect("valid test path")
    }

    #[test]
    fn test_alias_then_resolve_preserves_identity() {
        let mut registry = ModuleRegistry::new(DuplicatePolicy::Overwrite);
        let module = Namespace::new("pkg").into_handle();
        let outcome = registry
            .alias(path("pkg"), Arc::clone(&module))
            .expect("insert");
        assert_eq!(outcome, AliasOutcome::Inserted);

        let resolved = registry.resolve(&path("pkg")).expect("bound");
        assert!(same_module(&resolved, &module));
        // Resolving again yields the same object
        let again = registry.resolve(&path("pkg")).expect("bound");
        assert!(same_module(&again, &resolved));
    }

    #[test]
    fn test_realias_same_module_is_unchanged() {
        let mut registry = ModuleRegistry::new(DuplicatePolicy::Reject);
        let module = Namespace::new("pkg").into_handle();
        registry
            .alias(path("pkg"), Arc::clone(&module))
            .expect("insert");
        // Same object is a no-op even under Reject
        let outcome = registry
            .alias(path("pkg"), Arc::clone(&module))
            .expect("no-op");
        assert_eq!(outcome, AliasOutcome::Unchanged);
    }

    #[test]
    fn test_overwrite_policy_replaces() {
        let mut registry = ModuleRegistry::new(DuplicatePolicy::Overwrite);
        let first = Namespace::new("pkg").into_handle();
        let second = Namespace::new("pkg").into_handle();
        registry.alias(path("pkg"), first).expect("insert");
        let outcome = registry
            .alias(path("pkg"), Arc::clone(&second))
            .expect("overwrite");
        assert_eq!(outcome, AliasOutcome::Replaced);
        let resolved = registry.resolve(&path("pkg")).expect("bound");
        assert!(same_module(&resolved, &second));
    }

    #[test]
    fn test_reject_policy_refuses_different_module() {
        let mut registry = ModuleRegistry::new(DuplicatePolicy::Reject);
        let first = Namespace::new("pkg").into_handle();
        let second = Namespace::new("pkg").into_handle();
        registry.alias(path("pkg"), Arc::clone(&first)).expect("insert");
        let err = registry
            .alias(path("pkg"), second)
            .expect_err("must refuse");
        assert!(matches!(err, HostError::DuplicateAlias(p) if p == "pkg"));
        // The original binding survives
        let resolved = registry.resolve(&path("pkg")).expect("bound");
        assert!(same_module(&resolved, &first));
    }

    #[test]
    fn test_unbound_path_misses() {
        let registry = ModuleRegistry::new(DuplicatePolicy::Overwrite);
        assert!(registry.resolve(&path("nowhere")).is_none());
        assert!(registry.is_empty());
    }
}
