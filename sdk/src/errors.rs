//! Error types and handling
//!
//! This module provides the error types used throughout the synapse host.
//! All errors implement the `HostErrorExt` trait which provides
//! user-friendly hints and indicates whether errors are recoverable.
//!
//! Initialization failures are never retried: a refused hook registration
//! or a missing native symbol cannot succeed without external intervention
//! (fixing the extension or the host compatibility requirement).

use thiserror::Error;

/// Trait for host error extensions
///
/// Provides additional context for errors: a user-facing hint and whether
/// the error is recoverable. Non-recoverable errors abort initialization
/// entirely so that no partial public namespace is left importable.
pub trait HostErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be worked around by the caller (for example
    /// by choosing a different alias path). Non-recoverable errors require
    /// fixing the extension, the manifest, or the host itself.
    fn is_recoverable(&self) -> bool;
}

/// Main host error type
///
/// # Error Categories
///
/// - **Hook**: import hook registration refused or used before install
/// - **Registry**: alias path syntax and duplicate-alias conflicts
/// - **Re-export**: symbols missing from a source namespace
/// - **Loading**: native shared library and entry-point failures
/// - **Configuration**: invalid or unreadable configuration
#[derive(Debug, Error)]
pub enum HostError {
    // Hook errors
    #[error("Hook installation refused: {0}")]
    HookInstall(String),

    #[error("Incompatible host API: extension requires {required}, host supports {supported}")]
    IncompatibleHostApi { required: String, supported: String },

    // Registry errors
    #[error("Invalid module path: {0}")]
    InvalidModulePath(String),

    #[error("Alias path already bound to a different module: {0}")]
    DuplicateAlias(String),

    // Re-export errors
    #[error("Missing symbol: {0}")]
    MissingSymbol(String),

    #[error("Binding is not a module: {0}")]
    NotAModule(String),

    // Native loading errors
    #[error("Extension not in manifest: {0}")]
    ExtensionNotInManifest(String),

    #[error("Failed to load extension library: {0}")]
    LibraryLoad(String),

    #[error("Entry symbol not found: {0}")]
    EntrySymbolNotFound(String),

    #[error("Extension entry returned null")]
    EntryReturnedNull,

    #[error("Extension '{extension}' does not bind declared export '{symbol}'")]
    ExportsMismatch { extension: String, symbol: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HostErrorExt for HostError {
    fn user_hint(&self) -> &str {
        match self {
            HostError::HookInstall(_) => {
                "The import hook could not be registered. Check that the host version supports this loader."
            }
            HostError::IncompatibleHostApi { .. } => {
                "The extension was built against a different host ABI. Rebuild it against this SDK."
            }
            HostError::InvalidModulePath(_) => {
                "Module paths are dot-separated identifiers, e.g. 'synapse.data_types'."
            }
            HostError::DuplicateAlias(_) => {
                "The path is already bound to a different module. Pick another path or allow overwriting in the registry configuration."
            }
            HostError::MissingSymbol(_) => {
                "The source namespace does not export this symbol. Check the extension's export list."
            }
            HostError::NotAModule(_) => {
                "The binding exists but does not carry a namespace, so it cannot be aliased as a submodule."
            }
            HostError::ExtensionNotInManifest(_) => {
                "The extension is not declared in the manifest. Add an entry before loading it."
            }
            HostError::LibraryLoad(_) => {
                "The shared library could not be loaded. Check the path and platform in the manifest."
            }
            HostError::EntrySymbolNotFound(_) => {
                "The library does not export the synapse entry symbol. It is probably not a synapse extension."
            }
            HostError::EntryReturnedNull => {
                "The extension failed to construct itself. Check the extension's own logs."
            }
            HostError::ExportsMismatch { .. } => {
                "The manifest declares an export the extension does not bind. Regenerate the manifest."
            }
            HostError::Config(_) => {
                "The configuration file is invalid. Fix it or delete it to regenerate defaults."
            }
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Another alias path or policy can be chosen by the caller
            HostError::DuplicateAlias(_) | HostError::InvalidModulePath(_) => true,
            HostError::Config(_) => true,
            // Everything else needs the extension, manifest, or host fixed
            HostError::HookInstall(_)
            | HostError::IncompatibleHostApi { .. }
            | HostError::MissingSymbol(_)
            | HostError::NotAModule(_)
            | HostError::ExtensionNotInManifest(_)
            | HostError::LibraryLoad(_)
            | HostError::EntrySymbolNotFound(_)
            | HostError::EntryReturnedNull
            | HostError::ExportsMismatch { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_symbol_names_the_symbol() {
        let err = HostError::MissingSymbol("Point".to_string());
        assert_eq!(err.to_string(), "Missing symbol: Point");
    }

    #[test]
    fn test_incompatible_api_reports_both_versions() {
        let err = HostError::IncompatibleHostApi {
            required: "2.0.0".to_string(),
            supported: "1.0.0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2.0.0"));
        assert!(msg.contains("1.0.0"));
    }

    #[test]
    fn test_recoverability_split() {
        assert!(HostError::DuplicateAlias("a.b".to_string()).is_recoverable());
        assert!(!HostError::HookInstall("refused".to_string()).is_recoverable());
        assert!(!HostError::MissingSymbol("x".to_string()).is_recoverable());
    }

    #[test]
    fn test_every_error_has_a_hint() {
        let errors = vec![
            HostError::HookInstall("x".into()),
            HostError::DuplicateAlias("a.b".into()),
            HostError::MissingSymbol("s".into()),
            HostError::EntryReturnedNull,
            HostError::Config("bad".into()),
        ];
        for err in errors {
            assert!(!err.user_hint().is_empty());
        }
    }
}
