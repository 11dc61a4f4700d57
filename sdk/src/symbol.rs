//! Symbol and namespace types
//!
//! A `Symbol` is an identity-preserving handle to a single exported object.
//! A `Namespace` is a named table of symbols together with the explicit list
//! of names the owning module declares public. Extensions hand namespaces to
//! the host; the host aliases them into its module registry and copies
//! bindings between them during re-export.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Handle to one exported object.
///
/// Cloning a `Symbol` never copies the underlying object: every clone denotes
/// the same object until a binding is explicitly rebound. Identity can be
/// checked with [`Symbol::same_object`].
///
/// # Examples
///
/// ```
/// use sdk::symbol::Symbol;
///
/// let a = Symbol::new(42i64);
/// let b = a.clone();
/// assert!(a.same_object(&b));
/// assert_eq!(b.downcast_ref::<i64>(), Some(&42));
/// ```
#[derive(Clone)]
pub struct Symbol {
    object: Arc<dyn Any + Send + Sync>,
}

impl Symbol {
    /// Wrap a value in a new symbol
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            object: Arc::new(value),
        }
    }

    /// Wrap an already shared object without re-allocating
    pub fn from_arc(object: Arc<dyn Any + Send + Sync>) -> Self {
        Self { object }
    }

    /// Wrap a module handle so a namespace can carry a submodule binding
    pub fn module(handle: ModuleHandle) -> Self {
        Self {
            object: Arc::new(handle),
        }
    }

    /// Borrow the underlying object as `T`, if it has that type
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }

    /// Check whether the underlying object has type `T`
    pub fn is<T: Any + Send + Sync>(&self) -> bool {
        self.object.is::<T>()
    }

    /// The submodule carried by this binding, if it is one
    pub fn as_module(&self) -> Option<ModuleHandle> {
        self.object
            .downcast_ref::<ModuleHandle>()
            .map(Arc::clone)
    }

    /// Whether two symbols denote the same underlying object.
    ///
    /// This is pointer identity, not structural equality.
    pub fn same_object(&self, other: &Symbol) -> bool {
        let a = Arc::as_ptr(&self.object) as *const ();
        let b = Arc::as_ptr(&other.object) as *const ();
        std::ptr::eq(a, b)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol").finish_non_exhaustive()
    }
}

/// Shared handle to a namespace.
///
/// The module registry stores handles, never namespace copies, so every
/// resolution of an aliased path observes the same object.
pub type ModuleHandle = Arc<Namespace>;

/// Whether two handles point at the same namespace object
pub fn same_module(a: &ModuleHandle, b: &ModuleHandle) -> bool {
    Arc::ptr_eq(a, b)
}

/// A named table of symbol bindings plus its declared public names.
///
/// The public name list is the explicit, enumerable export contract:
/// wildcard re-export copies exactly these names, nothing discovered by
/// reflection. A name may be declared public before it is bound;
/// [`Namespace::verify_exports`] catches the mismatch.
#[derive(Debug, Default)]
pub struct Namespace {
    name: String,
    bindings: std::collections::HashMap<String, Symbol>,
    public: Vec<String>,
}

impl Namespace {
    /// Create an empty namespace with the given dotted name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: std::collections::HashMap::new(),
            public: Vec::new(),
        }
    }

    /// The namespace's own name (e.g. `synapse.data_types`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind `name` to `symbol`, returning the previous binding if any.
    ///
    /// Binding does not make the name public; see [`Namespace::bind_public`].
    pub fn bind(&mut self, name: impl Into<String>, symbol: Symbol) -> Option<Symbol> {
        self.bindings.insert(name.into(), symbol)
    }

    /// Bind `name` and add it to the declared public names
    pub fn bind_public(&mut self, name: impl Into<String>, symbol: Symbol) -> Option<Symbol> {
        let name = name.into();
        self.declare_public(name.clone());
        self.bindings.insert(name, symbol)
    }

    /// Add a name to the declared public list without binding it
    pub fn declare_public(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.public.contains(&name) {
            self.public.push(name);
        }
    }

    /// Look up a binding by name
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.bindings.get(name)
    }

    /// Whether a binding exists for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// The declared public names, in declaration order
    pub fn public_names(&self) -> &[String] {
        &self.public
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the namespace has no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Check that every declared public name is actually bound.
    ///
    /// Returns the first declared-but-unbound name, in declaration order,
    /// as a [`crate::errors::HostError::MissingSymbol`].
    pub fn verify_exports(&self) -> Result<(), crate::errors::HostError> {
        for name in &self.public {
            if !self.bindings.contains_key(name) {
                return Err(crate::errors::HostError::MissingSymbol(name.clone()));
            }
        }
        Ok(())
    }

    /// Freeze the namespace into a shareable module handle
    pub fn into_handle(self) -> ModuleHandle {
        Arc::new(self)
    }
}
