//! Synapse SDK
//!
//! Shared library providing the traits and types that tie the synapse host
//! to its precompiled extensions. This crate is used by both the host and
//! the extension crates.

/// Extension trait and entry-point contract
pub mod extension;

/// Error types and handling
pub mod errors;

/// Symbol and namespace types
pub mod symbol;

/// Manifest types
pub mod manifest;

// Re-export commonly used types
pub use errors::{HostError, HostErrorExt};
pub use extension::{Extension, ExtensionEntryFn, ENTRY_SYMBOL, HOST_API_VERSION};
pub use manifest::{ExtensionEntry, Manifest};
pub use symbol::{same_module, ModuleHandle, Namespace, Symbol};
