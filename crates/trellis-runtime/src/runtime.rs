//! The runtime context: registry handle, construction, singletons
//!
//! A `Runtime` owns one type registry and one tag interner. Everything is
//! single-threaded and fully synchronous; the handle is a cheap `Rc` clone so
//! generated constructors and accessors can hold their own copy.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::error::RuntimeError;
use crate::intern::{SignatureTag, TagInterner};
use crate::object::{Instance, ObjRef};
use crate::registry::{TypeDecl, TypeDescriptor, TypeId, TypeRegistry};
use crate::value::Value;

/// Name of the designated initializer every constructible type declares (or
/// inherits).
pub const INIT_METHOD: &str = "$init";

pub(crate) struct RuntimeInner {
    pub(crate) registry: RefCell<TypeRegistry>,
    pub(crate) tags: RefCell<TagInterner>,
}

/// Handle to one object-model runtime.
///
/// Cloning shares the underlying registry. The runtime is `!Send`: the host
/// execution model is single-threaded, and lazy singleton construction is
/// deliberately not synchronized (a concurrent host must wrap accessors in
/// external mutual exclusion).
#[derive(Clone)]
pub struct Runtime {
    pub(crate) inner: Rc<RuntimeInner>,
}

impl Runtime {
    /// Create a runtime with the bootstrap hierarchy registered: the
    /// universal root, the object root, the metaclass type, and the
    /// always-required value and reference types of the source hierarchy.
    pub fn new() -> Result<Self, RuntimeError> {
        let rt = Self {
            inner: Rc::new(RuntimeInner {
                registry: RefCell::new(TypeRegistry::new()),
                tags: RefCell::new(TagInterner::new()),
            }),
        };
        rt.bootstrap()?;
        Ok(rt)
    }

    /// Register a type and return its constructor.
    ///
    /// `supertypes` is the full transitive linearization of the type's
    /// ancestors, most-derived first, ending at the universal root; use
    /// [`Runtime::linearization`] of the direct parent to obtain it for plain
    /// single inheritance.
    pub fn register_type(
        &self,
        identifier: &str,
        decl: TypeDecl,
        supertypes: &[TypeId],
    ) -> Result<TypeConstructor, RuntimeError> {
        let id = self
            .inner
            .registry
            .borrow_mut()
            .register(identifier, decl, supertypes, false)?;
        Ok(TypeConstructor {
            runtime: self.clone(),
            id,
        })
    }

    /// Register a singleton type and return its lazy accessor. The optional
    /// `outer` value is passed to the initializer on first construction.
    pub fn register_singleton(
        &self,
        identifier: &str,
        decl: TypeDecl,
        supertypes: &[TypeId],
        outer: Option<Value>,
    ) -> Result<Singleton, RuntimeError> {
        let id = self
            .inner
            .registry
            .borrow_mut()
            .register(identifier, decl, supertypes, true)?;
        Ok(Singleton {
            constructor: TypeConstructor {
                runtime: self.clone(),
                id,
            },
            outer,
            instance: OnceCell::new(),
        })
    }

    /// Resolve a type identifier to its id.
    pub fn lookup_type(&self, identifier: &str) -> Result<TypeId, RuntimeError> {
        self.inner
            .registry
            .borrow()
            .lookup(identifier)
            .ok_or_else(|| RuntimeError::UnknownType(identifier.to_string()))
    }

    /// The identifier of a registered type.
    pub fn identifier_of(&self, id: TypeId) -> String {
        self.inner.registry.borrow().identifier(id).to_string()
    }

    /// A copy of a registered type's descriptor.
    pub fn descriptor(&self, id: TypeId) -> TypeDescriptor {
        self.inner.registry.borrow().descriptor(id).clone()
    }

    /// A type's precomputed resolution order (the type itself first). For a
    /// subtype with parent `p`, `linearization(p)` is exactly the supertype
    /// list to pass to [`Runtime::register_type`].
    pub fn linearization(&self, id: TypeId) -> Vec<TypeId> {
        self.inner.registry.borrow().resolution_order(id).to_vec()
    }

    /// Intern a signature-tag string.
    pub fn signature_tag(&self, text: &str) -> SignatureTag {
        self.inner.tags.borrow_mut().intern(text)
    }

    /// The text a signature tag was interned from.
    pub fn tag_text(&self, tag: SignatureTag) -> String {
        self.inner.tags.borrow().resolve(tag).to_string()
    }

    /// Construct a fresh instance of a type: allocate it, then run the
    /// designated initializer through normal virtual dispatch.
    pub fn construct(&self, id: TypeId, args: &[Value]) -> Result<ObjRef, RuntimeError> {
        let obj = Instance::new(id);
        self.invoke(&obj, INIT_METHOD, args)?;
        Ok(obj)
    }
}

/// Constructor handle for one registered type.
///
/// Type-level (static) members resolve against the type's own declared table
/// only; they are never inherited.
pub struct TypeConstructor {
    runtime: Runtime,
    id: TypeId,
}

impl TypeConstructor {
    /// The constructed type's id.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// A copy of the constructed type's descriptor.
    pub fn descriptor(&self) -> TypeDescriptor {
        self.runtime.descriptor(self.id)
    }

    /// Construct an instance.
    pub fn construct(&self, args: &[Value]) -> Result<ObjRef, RuntimeError> {
        self.runtime.construct(self.id, args)
    }

    /// Invoke a static member declared on this type.
    pub fn invoke_static(&self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        self.runtime.invoke_static(self.id, name, args)
    }
}

/// Lazy accessor for a singleton type.
///
/// The first call constructs the one instance; every later call returns the
/// same reference. Not thread-synchronized.
pub struct Singleton {
    constructor: TypeConstructor,
    outer: Option<Value>,
    instance: OnceCell<ObjRef>,
}

impl Singleton {
    /// The singleton type's id.
    pub fn type_id(&self) -> TypeId {
        self.constructor.type_id()
    }

    /// The memoized instance, constructing it on first access.
    pub fn get(&self) -> Result<ObjRef, RuntimeError> {
        let obj = self.instance.get_or_try_init(|| {
            let args: Vec<Value> = self.outer.iter().cloned().collect();
            self.constructor.construct(&args)
        })?;
        Ok(Rc::clone(obj))
    }
}
