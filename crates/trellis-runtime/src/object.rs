//! Instance model and identity allocation

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;

use crate::intern::SignatureTag;
use crate::registry::TypeId;
use crate::value::Value;

/// Global counter for generating unique instance IDs
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique instance ID
fn generate_instance_id() -> u64 {
    NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Shared handle to a runtime instance. Identity is `Rc` pointer identity,
/// equivalently the instance id.
pub type ObjRef = Rc<Instance>;

/// A constructed instance of a registered type.
///
/// Fields and parametric fields are name-keyed; parametric fields are
/// additionally qualified by the signature tag of the declaring-type context,
/// so a subtype shadowing a constructor parameter does not collide with its
/// supertype's copy.
#[derive(Debug)]
pub struct Instance {
    /// Unique instance ID (assigned at construction).
    id: u64,
    /// The instance's type (index into the runtime's type registry).
    type_id: TypeId,
    /// Field values by name.
    fields: RefCell<FxHashMap<String, Value>>,
    /// Parametric field values, by name then by declaring-type tag.
    params: RefCell<FxHashMap<String, FxHashMap<SignatureTag, Value>>>,
}

impl Instance {
    /// Allocate a fresh instance of the given type with empty field tables.
    pub fn new(type_id: TypeId) -> ObjRef {
        Rc::new(Self {
            id: generate_instance_id(),
            type_id,
            fields: RefCell::new(FxHashMap::default()),
            params: RefCell::new(FxHashMap::default()),
        })
    }

    /// The instance's unique id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The instance's type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Read a field.
    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    /// Write a field.
    pub fn set_field(&self, name: &str, value: Value) {
        self.fields.borrow_mut().insert(name.to_string(), value);
    }

    /// Read a parametric field in the given declaring-type context.
    pub fn parameter(&self, name: &str, context: SignatureTag) -> Option<Value> {
        self.params
            .borrow()
            .get(name)
            .and_then(|by_context| by_context.get(&context))
            .cloned()
    }

    /// Write a parametric field in the given declaring-type context.
    pub fn set_parameter(&self, name: &str, context: SignatureTag, value: Value) {
        self.params
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .insert(context, value);
    }

    /// Snapshot of all fields, for the serializer.
    pub fn fields_snapshot(&self) -> Vec<(String, Value)> {
        self.fields
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
