//! Data Types Extension
//!
//! The reference precompiled extension: exposes the runtime handle plus a
//! `data_types` namespace of schema-building constructors, the surface the
//! public synapse package re-exports at startup.

use sdk::extension::{Extension, HOST_API_VERSION};
use sdk::symbol::{ModuleHandle, Namespace, Symbol};
use std::sync::{Arc, OnceLock};

/// Primitive column type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
    Boolean,
}

/// Sort order for an indexed field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrder {
    Ascending,
    Descending,
}

/// One column in a schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub required: bool,
    pub index: Option<IndexOrder>,
}

impl Field {
    /// Create an optional, unindexed field
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            required: false,
            index: None,
        }
    }

    /// Mark the field required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Index the field with the given order
    pub fn index(mut self, order: IndexOrder) -> Self {
        self.index = Some(order);
        self
    }
}

/// An ordered collection of fields
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Handle to an engine rooted at a storage URL
#[derive(Debug, Clone)]
pub struct Runtime {
    root: String,
}

impl Runtime {
    /// Open a runtime over the given root URL
    pub fn open(root: impl Into<String>) -> Self {
        let root = root.into();
        tracing::info!("Runtime opened at {}", root);
        Self { root }
    }

    pub fn root(&self) -> &str {
        &self.root
    }
}

/// Descriptor published as the `Runtime` binding
#[derive(Debug, Clone, Copy)]
pub struct RuntimeType;

impl RuntimeType {
    /// Instantiate a runtime, the same way the `runtime` factory does
    pub fn open(&self, root: impl Into<String>) -> Runtime {
        Runtime::open(root)
    }
}

fn runtime_factory(root: String) -> Runtime {
    Runtime::open(root)
}

fn field_ctor(name: String, data_type: DataType) -> Field {
    Field::new(name, data_type)
}

fn schema_ctor(fields: Vec<Field>) -> Schema {
    Schema::new(fields)
}

/// The extension object handed to the host
pub struct DatatypesExtension {
    namespace: OnceLock<ModuleHandle>,
}

impl DatatypesExtension {
    pub fn new() -> Self {
        Self {
            namespace: OnceLock::new(),
        }
    }

    fn build_namespace() -> ModuleHandle {
        let mut data_types = Namespace::new("synapse.data_types");
        data_types.bind_public("field", Symbol::new(field_ctor as fn(String, DataType) -> Field));
        data_types.bind_public(
            "schema",
            Symbol::new(schema_ctor as fn(Vec<Field>) -> Schema),
        );
        data_types.bind_public("int32", Symbol::new(DataType::Int32));
        data_types.bind_public("int64", Symbol::new(DataType::Int64));
        data_types.bind_public("float32", Symbol::new(DataType::Float32));
        data_types.bind_public("float64", Symbol::new(DataType::Float64));
        data_types.bind_public("utf8", Symbol::new(DataType::Utf8));
        data_types.bind_public("boolean", Symbol::new(DataType::Boolean));

        let mut root = Namespace::new("synapse._internal");
        root.bind_public(
            "runtime",
            Symbol::new(runtime_factory as fn(String) -> Runtime),
        );
        root.bind_public("Runtime", Symbol::new(RuntimeType));
        root.bind_public("data_types", Symbol::module(data_types.into_handle()));
        root.into_handle()
    }
}

impl Default for DatatypesExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl Extension for DatatypesExtension {
    fn name(&self) -> &str {
        "datatypes"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn api_version(&self) -> &str {
        HOST_API_VERSION
    }

    fn namespace(&self) -> ModuleHandle {
        let handle = self.namespace.get_or_init(Self::build_namespace);
        Arc::clone(handle)
    }
}

/// FFI export for creating the extension
#[allow(improper_ctypes_definitions)]
#[no_mangle]
pub extern "C" fn synapse_extension_entry() -> *mut dyn Extension {
    Box::into_raw(Box::new(DatatypesExtension::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdk::symbol::same_module;

    #[test]
    fn test_namespace_is_stable_across_calls() {
        let ext = DatatypesExtension::new();
        let a = ext.namespace();
        let b = ext.namespace();
        assert!(same_module(&a, &b));
    }

    #[test]
    fn test_root_namespace_binds_entry_points() {
        let ext = DatatypesExtension::new();
        let root = ext.namespace();
        for name in ["runtime", "Runtime", "data_types"] {
            assert!(root.contains(name), "{name} must be bound");
        }
        root.verify_exports().expect("all public names bound");
    }

    #[test]
    fn test_data_types_exports_are_usable() {
        let ext = DatatypesExtension::new();
        let root = ext.namespace();
        let data_types = root
            .get("data_types")
            .and_then(Symbol::as_module)
            .expect("data_types submodule");
        data_types.verify_exports().expect("all public names bound");

        let field = data_types
            .get("field")
            .and_then(|s| s.downcast_ref::<fn(String, DataType) -> Field>().copied())
            .expect("field constructor");
        let schema = data_types
            .get("schema")
            .and_then(|s| s.downcast_ref::<fn(Vec<Field>) -> Schema>().copied())
            .expect("schema constructor");

        let built = schema(vec![
            field("i".to_string(), DataType::Int32).required(),
            field("x".to_string(), DataType::Float32),
            field("y".to_string(), DataType::Float32),
        ]);
        assert_eq!(built.fields().len(), 3);
        assert!(built.field("i").is_some_and(|f| f.required));
    }

    #[test]
    fn test_runtime_factory_and_type_agree() {
        let ext = DatatypesExtension::new();
        let root = ext.namespace();
        let factory = root
            .get("runtime")
            .and_then(|s| s.downcast_ref::<fn(String) -> Runtime>().copied())
            .expect("runtime factory");
        let runtime = factory("file:///tmp/synapse".to_string());
        assert_eq!(runtime.root(), "file:///tmp/synapse");

        let runtime_type = root
            .get("Runtime")
            .and_then(|s| s.downcast_ref::<RuntimeType>().copied())
            .expect("Runtime descriptor");
        assert_eq!(runtime_type.open("file:///tmp/x").root(), "file:///tmp/x");
    }
}
