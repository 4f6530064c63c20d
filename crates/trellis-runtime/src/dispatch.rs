//! Method dispatch: virtual calls, super calls, overload selection
//!
//! Dispatch is a table lookup along the receiver type's precomputed
//! resolution order. The dispatcher itself is stateless; side effects are
//! whatever the invoked implementation performs.

use std::rc::Rc;

use crate::error::RuntimeError;
use crate::intern::SignatureTag;
use crate::object::ObjRef;
use crate::registry::{Method, TypeId};
use crate::runtime::Runtime;
use crate::value::Value;

impl Runtime {
    /// First implementation of `method` along the resolution order starting
    /// at `start` (standard override semantics).
    fn resolve_virtual(&self, start: TypeId, method: &str) -> Option<Method> {
        let registry = self.inner.registry.borrow();
        registry
            .resolution_order(start)
            .iter()
            .find_map(|&t| registry.declared_method(t, method))
    }

    /// Invoke a method on an instance with standard virtual dispatch.
    pub fn invoke(
        &self,
        instance: &ObjRef,
        method: &str,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        let resolved = self
            .resolve_virtual(instance.type_id(), method)
            .ok_or_else(|| RuntimeError::MissingMethod {
                method: method.to_string(),
                type_identifier: self.identifier_of(instance.type_id()),
            })?;
        resolved(self, Some(instance), args)
    }

    /// Invoke the version of `method` declared above `declaring_type_identifier`
    /// in the receiver's hierarchy.
    ///
    /// The implicit form walks the receiver's resolution order, skips until
    /// the declaring type has been passed, and takes the next type that
    /// declares the method. When `explicit_super` names an ancestor, the walk
    /// is bypassed and the method is looked up directly in that type's own
    /// declared table (used when the compiler already knows the exact target).
    ///
    /// Either way the implementation runs bound to the original receiver, so
    /// virtual calls inside it still resolve against the full instance.
    pub fn invoke_super(
        &self,
        instance: &ObjRef,
        method: &str,
        args: &[Value],
        declaring_type_identifier: &str,
        explicit_super: Option<&str>,
    ) -> Result<Value, RuntimeError> {
        if let Some(super_identifier) = explicit_super {
            let super_id = self.lookup_type(super_identifier)?;
            let resolved = self
                .inner
                .registry
                .borrow()
                .declared_method(super_id, method)
                .ok_or_else(|| RuntimeError::MissingMethod {
                    method: method.to_string(),
                    type_identifier: super_identifier.to_string(),
                })?;
            return resolved(self, Some(instance), args);
        }

        let resolved = {
            let registry = self.inner.registry.borrow();
            let mut passed_declaring = false;
            let mut found = None;
            for &t in registry.resolution_order(instance.type_id()) {
                if passed_declaring {
                    if let Some(m) = registry.declared_method(t, method) {
                        found = Some(m);
                        break;
                    }
                } else if registry.identifier(t) == declaring_type_identifier {
                    passed_declaring = true;
                }
            }
            found
        };

        let resolved = resolved.ok_or_else(|| RuntimeError::MissingSuperMethod {
            method: method.to_string(),
            type_identifier: declaring_type_identifier.to_string(),
        })?;
        resolved(self, Some(instance), args)
    }

    /// Invoke a static member declared on the type itself. Statics are not
    /// inherited.
    pub fn invoke_static(
        &self,
        type_id: TypeId,
        method: &str,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        let resolved = self
            .inner
            .registry
            .borrow()
            .declared_static(type_id, method)
            .ok_or_else(|| RuntimeError::MissingMethod {
                method: method.to_string(),
                type_identifier: self.identifier_of(type_id),
            })?;
        resolved(self, None, args)
    }
}

/// Build an overloadable method from its variants.
///
/// `declaring_method_id` is the fully qualified method id
/// (`<type identifier>.<method name>`). The produced method requires the last
/// positional argument to be a signature tag and scans the variants in order
/// for an exact match; the matching variant receives the full argument list,
/// tag included. When no variant matches, the super version of the method
/// above the declaring type is invoked instead, with the same arguments.
///
/// A missing or non-tag trailing argument is a fatal usage error.
pub fn overloaded_method(
    declaring_method_id: &str,
    variants: Vec<(SignatureTag, Method)>,
) -> Method {
    let (type_identifier, method_name) = match declaring_method_id.rsplit_once('.') {
        Some((t, m)) => (t.to_string(), m.to_string()),
        None => (String::new(), declaring_method_id.to_string()),
    };

    Rc::new(move |rt, recv, args| {
        let tag = args.last().and_then(Value::as_tag).ok_or_else(|| {
            RuntimeError::InvalidSignatureTag {
                method: method_name.clone(),
            }
        })?;

        for (variant, implementation) in &variants {
            if *variant == tag {
                return implementation(rt, recv, args);
            }
        }

        let this = recv.ok_or_else(|| RuntimeError::MissingSuperMethod {
            method: method_name.clone(),
            type_identifier: type_identifier.clone(),
        })?;
        rt.invoke_super(this, &method_name, args, &type_identifier, None)
    })
}
