//! Extension trait and entry-point contract
//!
//! This module defines the `Extension` trait that every precompiled native
//! extension must implement, and the C ABI entry-point convention the host
//! loader resolves after `dlopen`.

use crate::symbol::ModuleHandle;

/// Version of the host ABI this SDK speaks.
///
/// Extensions report the ABI version they were built against via
/// [`Extension::api_version`]; the host refuses to wire in an extension
/// whose version does not satisfy its supported requirement.
pub const HOST_API_VERSION: &str = "1.0.0";

/// Name of the C symbol every extension shared library must export.
///
/// The symbol has the signature of [`ExtensionEntryFn`] and returns an
/// owned trait object, or null on failure.
pub const ENTRY_SYMBOL: &[u8] = b"synapse_extension_entry";

/// Signature of the extension entry function resolved by the host loader
pub type ExtensionEntryFn = unsafe extern "C" fn() -> *mut dyn Extension;

/// Trait that all extensions must implement
///
/// # Examples
///
/// ```
/// use sdk::extension::{Extension, HOST_API_VERSION};
/// use sdk::symbol::{ModuleHandle, Namespace, Symbol};
/// use std::sync::{Arc, OnceLock};
///
/// struct Demo {
///     namespace: OnceLock<ModuleHandle>,
/// }
///
/// impl Extension for Demo {
///     fn name(&self) -> &str {
///         "demo"
///     }
///
///     fn version(&self) -> &str {
///         "0.1.0"
///     }
///
///     fn api_version(&self) -> &str {
///         HOST_API_VERSION
///     }
///
///     fn namespace(&self) -> ModuleHandle {
///         let handle = self.namespace.get_or_init(|| {
///             let mut root = Namespace::new("demo");
///             root.bind_public("answer", Symbol::new(42i64));
///             root.into_handle()
///         });
///         Arc::clone(handle)
///     }
/// }
/// ```
pub trait Extension: Send + Sync {
    /// Returns the name of the extension
    fn name(&self) -> &str;

    /// Returns the version of the extension
    fn version(&self) -> &str;

    /// Host ABI version the extension was built against (semver string)
    fn api_version(&self) -> &str;

    /// Returns the extension's root namespace.
    ///
    /// Must return a handle to the SAME namespace object on every call; the
    /// host relies on this for idempotent aliasing of virtual submodule
    /// paths. Implementations typically build the namespace once behind a
    /// `OnceLock`.
    fn namespace(&self) -> ModuleHandle;
}
