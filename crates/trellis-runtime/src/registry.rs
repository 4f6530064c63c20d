//! Type registry: descriptors, declared member tables, resolution order
//!
//! Each registered type carries the members it *declares* (not the ones it
//! inherits) plus a method-resolution order computed once at registration.
//! Virtual dispatch and super dispatch walk that precomputed order instead of
//! a live prototype chain.

use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::ObjRef;
use crate::runtime::Runtime;
use crate::value::Value;

/// Index of a registered type in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    /// The raw registry index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A method or static-member implementation.
///
/// Instance methods receive `Some(receiver)`; type-level (static) members
/// receive `None`. Arguments arrive exactly as the call site passed them,
/// including the trailing signature tag of overloaded calls.
pub type Method = Rc<dyn Fn(&Runtime, Option<&ObjRef>, &[Value]) -> Result<Value, RuntimeError>>;

/// Metaclass record: a type's identity, its transitive supertypes, and
/// whether it is a lazily constructed singleton.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Fully qualified, dot-separated type identifier.
    pub identifier: String,
    /// Full transitive supertype linearization, most-derived first, ending at
    /// the universal root. Immutable after registration except the one-time
    /// bootstrap patch pass.
    pub supertypes: Vec<TypeId>,
    /// Whether exactly one instance exists, constructed lazily.
    pub is_singleton: bool,
    /// The metaclass type (`java.lang.Class`). `None` only transiently during
    /// bootstrap, before the metaclass type itself exists.
    pub metaclass: Option<TypeId>,
}

impl TypeDescriptor {
    /// The identifier's last dot-separated segment.
    pub fn simple_name(&self) -> &str {
        self.identifier
            .rsplit_once('.')
            .map_or(self.identifier.as_str(), |(_, name)| name)
    }
}

/// The members a type declares at its own level.
///
/// Built by generated code and handed to `Runtime::register_type`.
#[derive(Default)]
pub struct TypeDecl {
    pub(crate) methods: FxHashMap<String, Method>,
    pub(crate) statics: FxHashMap<String, Method>,
}

impl TypeDecl {
    /// Start an empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an instance method.
    pub fn method<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&Runtime, Option<&ObjRef>, &[Value]) -> Result<Value, RuntimeError> + 'static,
    {
        self.methods.insert(name.to_string(), Rc::new(f));
        self
    }

    /// Declare an instance method from an already-built implementation
    /// (typically the output of `overloaded_method`).
    pub fn method_impl(mut self, name: &str, m: Method) -> Self {
        self.methods.insert(name.to_string(), m);
        self
    }

    /// Declare a type-level (static) member.
    pub fn static_method<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&Runtime, Option<&ObjRef>, &[Value]) -> Result<Value, RuntimeError> + 'static,
    {
        self.statics.insert(name.to_string(), Rc::new(f));
        self
    }
}

/// One registered type: descriptor plus declared member tables plus the
/// precomputed resolution order.
pub(crate) struct TypeEntry {
    pub(crate) descriptor: TypeDescriptor,
    pub(crate) methods: FxHashMap<String, Method>,
    pub(crate) statics: FxHashMap<String, Method>,
    /// The type itself followed by its linearized supertypes.
    pub(crate) mro: Vec<TypeId>,
}

/// Registry of all types known to one runtime.
///
/// Append-only after startup registration; written only while generated type
/// declarations run, read on every dispatch and type check thereafter.
#[derive(Default)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
    name_to_id: FxHashMap<String, TypeId>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type. `supertypes` must be the full transitive
    /// linearization, most-derived first, ending at the universal root
    /// (exactly what the compiler emits for the type).
    pub(crate) fn register(
        &mut self,
        identifier: &str,
        decl: TypeDecl,
        supertypes: &[TypeId],
        is_singleton: bool,
    ) -> Result<TypeId, RuntimeError> {
        if self.name_to_id.contains_key(identifier) {
            return Err(RuntimeError::DuplicateType(identifier.to_string()));
        }

        let id = TypeId(self.entries.len());
        let mut mro = Vec::with_capacity(supertypes.len() + 1);
        mro.push(id);
        mro.extend_from_slice(supertypes);

        self.entries.push(TypeEntry {
            descriptor: TypeDescriptor {
                identifier: identifier.to_string(),
                supertypes: supertypes.to_vec(),
                is_singleton,
                metaclass: self.name_to_id.get(crate::bootstrap::CLASS).copied(),
            },
            methods: decl.methods,
            statics: decl.statics,
            mro,
        });
        self.name_to_id.insert(identifier.to_string(), id);

        Ok(id)
    }

    /// Look a type up by identifier.
    pub fn lookup(&self, identifier: &str) -> Option<TypeId> {
        self.name_to_id.get(identifier).copied()
    }

    /// The descriptor of a registered type.
    pub fn descriptor(&self, id: TypeId) -> &TypeDescriptor {
        &self.entries[id.0].descriptor
    }

    /// The identifier of a registered type.
    pub fn identifier(&self, id: TypeId) -> &str {
        &self.entries[id.0].descriptor.identifier
    }

    /// The precomputed resolution order of a type (the type itself first).
    pub fn resolution_order(&self, id: TypeId) -> &[TypeId] {
        &self.entries[id.0].mro
    }

    /// A method declared at this type's own level, if any.
    pub(crate) fn declared_method(&self, id: TypeId, name: &str) -> Option<Method> {
        self.entries[id.0].methods.get(name).cloned()
    }

    /// A static member declared at this type's own level, if any.
    pub(crate) fn declared_static(&self, id: TypeId, name: &str) -> Option<Method> {
        self.entries[id.0].statics.get(name).cloned()
    }

    /// One-time bootstrap fix-up: overwrite a descriptor's metaclass link
    /// once the metaclass type exists. Not a general operation.
    pub(crate) fn patch_metaclass(&mut self, id: TypeId, metaclass: TypeId) {
        self.entries[id.0].descriptor.metaclass = Some(metaclass);
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
