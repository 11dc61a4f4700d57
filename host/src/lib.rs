//! Synapse Host Library
//!
//! This library wires a precompiled native extension into a stable public
//! namespace. It owns the module registry, the import hook that serves
//! virtual submodule paths from that registry, the re-export machinery,
//! and the loader that brings extension shared libraries into the process.

/// Configuration management module
pub mod config;

/// Validated dotted module paths
pub mod path;

/// Process-wide module registry
pub mod registry;

/// Import system and hook lifecycle
pub mod import;

/// Symbol re-export between namespaces
pub mod reexport;

/// Native extension loading
pub mod loader;

/// Initialization sequence
pub mod bootstrap;

/// Telemetry and Observability
pub mod telemetry;

/// Platform-specific utilities module
pub mod platform;
