//! Import system and hook lifecycle
//!
//! The [`ImportSystem`] is the explicit context object that replaces
//! ambient process-global state: it owns the module registry and the
//! import hook that serves virtual submodule paths from it. The hook has
//! exactly two states, uninstalled and installed, and the transition runs
//! once at startup; there is no reverse transition.

use sdk::errors::HostError;
use sdk::extension::HOST_API_VERSION;
use sdk::symbol::ModuleHandle;
use semver::{Version, VersionReq};

use crate::path::ModulePath;
use crate::registry::{AliasOutcome, DuplicatePolicy, ModuleRegistry};

/// Lifecycle state of the import hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    /// No hook registered; virtual path lookups miss
    Uninstalled,
    /// Hook active; lookups are served from the module registry
    Installed,
}

/// The import machinery a loader registers itself with.
///
/// Lookups of virtual submodule paths go through [`ImportSystem::resolve`]
/// and are answered from the in-memory registry once the hook is
/// installed. Before installation every lookup misses, and aliases are
/// refused, which enforces the startup ordering: install first, publish
/// second.
///
/// # Thread Safety
///
/// Not thread-safe by default. Wrap in `Arc<Mutex<_>>` if sharing across
/// threads is needed; the host adds no locking of its own.
#[derive(Debug)]
pub struct ImportSystem {
    state: HookState,
    registry: ModuleRegistry,
    supported_api: Option<VersionReq>,
}

impl ImportSystem {
    /// Create an import system with the default duplicate-alias policy
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    /// Create an import system with an explicit duplicate-alias policy
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            state: HookState::Uninstalled,
            registry: ModuleRegistry::new(policy),
            supported_api: None,
        }
    }

    /// Override the loader ABI requirement this import system accepts.
    ///
    /// By default any loader speaking a version compatible with
    /// [`HOST_API_VERSION`] is accepted.
    pub fn with_supported_api(mut self, requirement: VersionReq) -> Self {
        self.supported_api = Some(requirement);
        self
    }

    /// Register the import hook.
    ///
    /// Idempotent: calling this any number of times leaves the system in
    /// the same observable state as calling it once. Fails with
    /// [`HostError::HookInstall`] if this import system refuses the
    /// loader's ABI version; that failure is fatal and never retried.
    pub fn install_hook(&mut self) -> Result<(), HostError> {
        if self.state == HookState::Installed {
            tracing::debug!("Import hook already installed");
            return Ok(());
        }

        let version = Version::parse(HOST_API_VERSION)
            .map_err(|e| HostError::HookInstall(format!("invalid host API version: {e}")))?;
        let requirement = match &self.supported_api {
            Some(req) => req.clone(),
            None => default_supported_api()?,
        };
        if !requirement.matches(&version) {
            tracing::error!(
                "Import hook refused: loader ABI {} does not satisfy {}",
                version,
                requirement
            );
            return Err(HostError::HookInstall(format!(
                "loader ABI {version} does not satisfy host requirement {requirement}"
            )));
        }

        self.state = HookState::Installed;
        tracing::info!("Import hook installed (ABI {})", version);
        Ok(())
    }

    /// Current hook state
    pub fn state(&self) -> HookState {
        self.state
    }

    /// Whether the hook is installed
    pub fn hook_installed(&self) -> bool {
        self.state == HookState::Installed
    }

    /// Bind a module under a virtual submodule path.
    ///
    /// Requires the hook to be installed; publishing a path nobody can
    /// resolve yet would invert the startup ordering guarantee.
    pub fn alias_submodule(
        &mut self,
        path: ModulePath,
        module: ModuleHandle,
    ) -> Result<AliasOutcome, HostError> {
        if self.state != HookState::Installed {
            return Err(HostError::HookInstall(
                "import hook not installed".to_string(),
            ));
        }
        self.registry.alias(path, module)
    }

    /// Resolve a virtual path.
    ///
    /// Misses while the hook is uninstalled; afterwards returns the same
    /// object on every call for a given path.
    pub fn resolve(&self, path: &ModulePath) -> Option<ModuleHandle> {
        if self.state != HookState::Installed {
            return None;
        }
        self.registry.resolve(path)
    }

    /// Read access to the underlying registry
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }
}

impl Default for ImportSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that an extension's declared ABI version is one this host can
/// serve: the extension's caret requirement must match the host version.
pub fn verify_extension_api(api_version: &str) -> Result<(), HostError> {
    let requirement = VersionReq::parse(&format!("^{api_version}")).map_err(|_| {
        HostError::IncompatibleHostApi {
            required: api_version.to_string(),
            supported: HOST_API_VERSION.to_string(),
        }
    })?;
    let host = Version::parse(HOST_API_VERSION)
        .map_err(|e| HostError::HookInstall(format!("invalid host API version: {e}")))?;
    if !requirement.matches(&host) {
        return Err(HostError::IncompatibleHostApi {
            required: api_version.to_string(),
            supported: HOST_API_VERSION.to_string(),
        });
    }
    Ok(())
}

fn default_supported_api() -> Result<VersionReq, HostError> {
    VersionReq::parse(&format!("^{HOST_API_VERSION}"))
        .map_err(|e| HostError::HookInstall(format!("invalid host API requirement: {e}")))
}
