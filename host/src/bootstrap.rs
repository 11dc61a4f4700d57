//! Initialization sequence
//!
//! Wires a loaded extension into the public namespace: installs the
//! import hook, re-exports the extension's stable entry points plus the
//! public names of its `data_types` namespace, and registers the virtual
//! `<package>.data_types` submodule path.
//!
//! The sequence is atomic with respect to the import system: the public
//! namespace is built completely before anything is aliased, so a failure
//! at any step leaves no partial namespace importable.

use sdk::errors::HostError;
use sdk::extension::Extension;
use sdk::symbol::{same_module, ModuleHandle, Namespace, Symbol};
use std::sync::Arc;

use crate::import::{verify_extension_api, ImportSystem};
use crate::path::ModulePath;
use crate::reexport::{reexport, ReexportNames};
use crate::registry::DuplicatePolicy;

/// Name of the runtime factory binding every extension must expose
pub const RUNTIME_SYMBOL: &str = "runtime";

/// Name of the runtime type binding every extension must expose
pub const RUNTIME_TYPE_SYMBOL: &str = "Runtime";

/// Name of the data-types submodule binding every extension must expose
pub const DATA_TYPES_SYMBOL: &str = "data_types";

/// Install the hook and publish `extension` under `package`.
///
/// Re-running with the same package is a no-op that returns the already
/// published namespace, so two subsystems that each believe they
/// initialize first cannot create divergent duplicate modules.
///
/// # Errors
///
/// - [`HostError::HookInstall`] if the import system refuses the hook
/// - [`HostError::MissingSymbol`] if `runtime`, `Runtime`, `data_types`,
///   or any declared public name of `data_types` is absent
/// - [`HostError::NotAModule`] if `data_types` is not a namespace binding
/// - [`HostError::IncompatibleHostApi`] on an ABI mismatch
/// - [`HostError::DuplicateAlias`] if a target path is already bound to a
///   different module and the registry policy is
///   [`DuplicatePolicy::Reject`]
pub fn bootstrap(
    imports: &mut ImportSystem,
    extension: &dyn Extension,
    package: ModulePath,
) -> Result<ModuleHandle, HostError> {
    // Hook installation must be globally visible before any virtual path
    // is published or resolved.
    imports.install_hook()?;

    if let Some(existing) = imports.resolve(&package) {
        tracing::debug!("Package '{}' already initialized", package);
        return Ok(existing);
    }

    verify_extension_api(extension.api_version())?;

    let root = extension.namespace();
    let runtime = required_symbol(&root, RUNTIME_SYMBOL)?;
    let runtime_type = required_symbol(&root, RUNTIME_TYPE_SYMBOL)?;
    let data_types_binding = required_symbol(&root, DATA_TYPES_SYMBOL)?;
    let data_types = data_types_binding
        .as_module()
        .ok_or_else(|| HostError::NotAModule(DATA_TYPES_SYMBOL.to_string()))?;
    data_types.verify_exports()?;

    // Build the public namespace completely before touching the registry
    let mut public = Namespace::new(package.as_str());
    public.bind_public(RUNTIME_SYMBOL, runtime);
    public.bind_public(RUNTIME_TYPE_SYMBOL, runtime_type);
    public.bind_public(DATA_TYPES_SYMBOL, data_types_binding);
    reexport(&mut public, &data_types, &ReexportNames::Wildcard)?;
    let public = public.into_handle();

    let submodule_path = package.join(DATA_TYPES_SYMBOL)?;
    let aliases: [(ModulePath, ModuleHandle); 2] = [
        (submodule_path, Arc::clone(&data_types)),
        (package.clone(), Arc::clone(&public)),
    ];

    // Under Reject, check both paths up front so a conflict on the second
    // cannot leave the first half-published.
    if imports.registry().policy() == DuplicatePolicy::Reject {
        for (path, module) in &aliases {
            if let Some(existing) = imports.registry().resolve(path) {
                if !same_module(&existing, module) {
                    return Err(HostError::DuplicateAlias(path.to_string()));
                }
            }
        }
    }

    for (path, module) in aliases {
        imports.alias_submodule(path, module)?;
    }

    tracing::info!(
        "Initialized package '{}' from extension '{}' v{}",
        package,
        extension.name(),
        extension.version()
    );
    Ok(public)
}

fn required_symbol(root: &Namespace, name: &str) -> Result<Symbol, HostError> {
    root.get(name)
        .cloned()
        .ok_or_else(|| HostError::MissingSymbol(name.to_string()))
}
