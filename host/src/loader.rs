//! Native extension loading
//!
//! This module implements the [`NativeLoader`], which brings precompiled
//! extension shared libraries (.so/.dylib/.dll) into the process and
//! hands their namespaces to the import system.
//!
//! # Load Gates
//!
//! Every extension must pass three gates before its symbols become
//! reachable:
//!
//! 1. **Manifest** - the extension is declared in the manifest
//! 2. **ABI** - its declared host ABI version is one this host serves
//! 3. **Exports** - every export the manifest declares is actually bound
//!    in the loaded namespace
//!
//! A failed gate aborts the load; nothing of the extension is published.
//!
//! # Library Lifetime
//!
//! Loaded libraries are never unloaded. Registry entries persist for the
//! process lifetime and keep handing out symbols whose code lives in the
//! library, so dropping it would invalidate them.

use std::collections::HashMap;
use std::path::PathBuf;

use sdk::errors::HostError;
use sdk::extension::{Extension, ExtensionEntryFn, ENTRY_SYMBOL};
use sdk::manifest::Manifest;
use sdk::symbol::ModuleHandle;

use crate::import::verify_extension_api;

/// An extension wired into the process, with its library kept alive
pub struct LoadedExtension {
    // Field order matters: the extension's vtable lives in the library,
    // so the trait object must drop before the library does.
    extension: Box<dyn Extension>,
    #[allow(dead_code)]
    library: libloading::Library,
}

impl LoadedExtension {
    /// The extension's self-reported name
    pub fn name(&self) -> &str {
        self.extension.name()
    }

    /// The extension's version
    pub fn version(&self) -> &str {
        self.extension.version()
    }

    /// The host ABI version the extension was built against
    pub fn api_version(&self) -> &str {
        self.extension.api_version()
    }

    /// The extension's root namespace
    pub fn namespace(&self) -> ModuleHandle {
        self.extension.namespace()
    }

    /// The extension trait object
    pub fn extension(&self) -> &dyn Extension {
        self.extension.as_ref()
    }
}

/// Loader for precompiled extension shared libraries
///
/// # Thread Safety
///
/// Not thread-safe by default. Wrap in `Arc<Mutex<_>>` if sharing across
/// threads is needed.
pub struct NativeLoader {
    /// Manifest describing the installable extensions
    manifest: Manifest,
    /// Directory manifest paths are resolved against
    extension_dir: PathBuf,
    /// Loaded extensions indexed by name
    loaded: HashMap<String, LoadedExtension>,
}

impl NativeLoader {
    /// Create a loader over a manifest and the directory its paths are
    /// relative to
    pub fn new(manifest: Manifest, extension_dir: impl Into<PathBuf>) -> Self {
        tracing::info!("Initializing NativeLoader");
        Self {
            manifest,
            extension_dir: extension_dir.into(),
            loaded: HashMap::new(),
        }
    }

    /// Load an extension through the three gates.
    ///
    /// Loading an already-loaded extension is a no-op; the first load's
    /// object keeps being served.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::ExtensionNotInManifest`] if the extension is
    /// not declared (gate 1), [`HostError::IncompatibleHostApi`] on an ABI
    /// mismatch (gate 2), [`HostError::ExportsMismatch`] if a declared
    /// export is unbound (gate 3), and [`HostError::LibraryLoad`] /
    /// [`HostError::EntrySymbolNotFound`] / [`HostError::EntryReturnedNull`]
    /// when the shared library itself cannot be brought up.
    pub fn load(&mut self, name: &str) -> Result<(), HostError> {
        if self.loaded.contains_key(name) {
            tracing::debug!("Extension '{}' already loaded", name);
            return Ok(());
        }

        tracing::info!("Loading extension: {}", name);

        // Gate 1: manifest check
        let entry = self.manifest.get_extension(name).ok_or_else(|| {
            tracing::error!("Extension '{}' not found in manifest", name);
            HostError::ExtensionNotInManifest(name.to_string())
        })?;

        // Gate 2: declared ABI check, before touching the library
        verify_extension_api(&entry.api_version)?;

        let library_path = self.extension_dir.join(&entry.path);
        let exports = entry.exports.clone();

        // Load the shared library
        let library = unsafe {
            libloading::Library::new(&library_path).map_err(|e| {
                tracing::error!("Failed to load library {}: {}", library_path.display(), e);
                HostError::LibraryLoad(e.to_string())
            })?
        };

        // Resolve the entry function
        let entry_fn: libloading::Symbol<ExtensionEntryFn> = unsafe {
            library.get(ENTRY_SYMBOL).map_err(|e| {
                tracing::error!(
                    "Entry symbol not found in {}: {}",
                    library_path.display(),
                    e
                );
                HostError::EntrySymbolNotFound(e.to_string())
            })?
        };

        // Construct the extension instance
        let extension = unsafe {
            let ptr = entry_fn();
            if ptr.is_null() {
                tracing::error!("Extension entry returned null for '{}'", name);
                return Err(HostError::EntryReturnedNull);
            }
            Box::from_raw(ptr)
        };

        // Gate 2 again, against what the binary actually reports
        verify_extension_api(extension.api_version())?;

        // Gate 3: every manifest-declared export must be bound
        let namespace = extension.namespace();
        for export in &exports {
            if !namespace.contains(export) {
                tracing::error!(
                    "Extension '{}' does not bind declared export '{}'",
                    name,
                    export
                );
                return Err(HostError::ExportsMismatch {
                    extension: name.to_string(),
                    symbol: export.clone(),
                });
            }
        }
        // And every name the namespace itself declares public must exist
        namespace.verify_exports()?;

        self.loaded
            .insert(name.to_string(), LoadedExtension { extension, library });

        tracing::info!("Extension '{}' loaded successfully", name);
        Ok(())
    }

    /// Get a loaded extension by name
    pub fn get(&self, name: &str) -> Option<&LoadedExtension> {
        self.loaded.get(name)
    }

    /// Root namespace of a loaded extension
    pub fn namespace(&self, name: &str) -> Result<ModuleHandle, HostError> {
        self.loaded
            .get(name)
            .map(|ext| ext.namespace())
            .ok_or_else(|| HostError::ExtensionNotInManifest(name.to_string()))
    }

    /// Whether an extension is currently loaded
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// Names of all loaded extensions
    pub fn loaded_extensions(&self) -> Vec<String> {
        self.loaded.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdk::manifest::ExtensionEntry;

    fn manifest_with(entry: ExtensionEntry) -> Manifest {
        Manifest {
            version: "1.0.0".to_string(),
            generated_at: "2026-01-15T10:30:00Z".to_string(),
            extensions: vec![entry],
        }
    }

    #[test]
    fn test_load_refuses_extension_not_in_manifest() {
        let manifest = Manifest {
            version: "1.0.0".to_string(),
            generated_at: "2026-01-15T10:30:00Z".to_string(),
            extensions: vec![],
        };
        let mut loader = NativeLoader::new(manifest, "/nonexistent");
        let err = loader.load("ghost").expect_err("gate 1 must fail");
        assert!(matches!(err, HostError::ExtensionNotInManifest(name) if name == "ghost"));
    }

    #[test]
    fn test_load_refuses_incompatible_abi_before_touching_library() {
        let manifest = manifest_with(ExtensionEntry {
            name: "future".to_string(),
            version: "0.1.0".to_string(),
            api_version: "99.0.0".to_string(),
            path: "libfuture.so".to_string(),
            exports: vec![],
        });
        let mut loader = NativeLoader::new(manifest, "/nonexistent");
        // The path does not exist; gate 2 must fire before any dlopen attempt
        let err = loader.load("future").expect_err("gate 2 must fail");
        assert!(matches!(err, HostError::IncompatibleHostApi { .. }));
    }

    #[test]
    fn test_load_reports_library_failure() {
        let manifest = manifest_with(ExtensionEntry {
            name: "missing".to_string(),
            version: "0.1.0".to_string(),
            api_version: "1.0.0".to_string(),
            path: "libmissing.so".to_string(),
            exports: vec![],
        });
        let mut loader = NativeLoader::new(manifest, "/nonexistent");
        let err = loader.load("missing").expect_err("dlopen must fail");
        assert!(matches!(err, HostError::LibraryLoad(_)));
        assert!(!loader.is_loaded("missing"));
    }

    #[test]
    fn test_loaded_extensions_empty() {
        let manifest = Manifest {
            version: "1.0.0".to_string(),
            generated_at: "2026-01-15T10:30:00Z".to_string(),
            extensions: vec![],
        };
        let loader = NativeLoader::new(manifest, "/tmp");
        assert!(loader.loaded_extensions().is_empty());
        assert!(loader.get("anything").is_none());
    }
}
