//! Startup registration of the source-language core hierarchy
//!
//! The root type, the object root, and the metaclass type are mutually
//! referential: every descriptor is conceptually an instance of the metaclass
//! type, but the metaclass type is itself a subtype of the object root. The
//! cycle is broken with two-phase initialization: the trio is registered with
//! provisional descriptors (no metaclass link), then one finalize pass patches
//! the links once all three exist.

use crate::error::RuntimeError;
use crate::registry::TypeDecl;
use crate::runtime::{Runtime, INIT_METHOD};
use crate::value::Value;

/// The universal root type.
pub const ROOT: &str = "scala.Any";
/// Root of the value (primitive) types.
pub const VALUE_ROOT: &str = "scala.AnyVal";
/// Root of the reference types.
pub const OBJECT: &str = "java.lang.Object";
/// The metaclass type.
pub const CLASS: &str = "java.lang.Class";
/// The boolean type.
pub const BOOLEAN: &str = "scala.Boolean";
/// The single-character type.
pub const CHAR: &str = "scala.Char";
/// The string type.
pub const STRING: &str = "java.lang.String";
/// The array type.
pub const ARRAY: &str = "scala.Array";
/// Cast-failure exception type.
pub const CLASS_CAST_EXCEPTION: &str = "java.lang.ClassCastException";
/// Null-dereference exception type.
pub const NULL_POINTER_EXCEPTION: &str = "java.lang.NullPointerException";

/// Integral numeric types, narrowest first. Membership is inclusive of the
/// whole list for the integral `is_instance` rule.
pub const INTEGRAL_TYPES: [&str; 4] = ["scala.Byte", "scala.Short", "scala.Int", "scala.Long"];
/// Floating-point numeric types.
pub const FLOATING_TYPES: [&str; 2] = ["scala.Float", "scala.Double"];

/// Default integral type reported by `class_of` for fractionless numbers.
pub const INT: &str = "scala.Int";
/// Default floating type reported by `class_of` for fractional numbers.
pub const DOUBLE: &str = "scala.Double";

impl Runtime {
    /// Register the core hierarchy. Called once from [`Runtime::new`].
    pub(crate) fn bootstrap(&self) -> Result<(), RuntimeError> {
        // Phase one: the mutually referential trio, provisional descriptors.
        let root = self
            .register_type(
                ROOT,
                TypeDecl::new().method(INIT_METHOD, |_rt, _recv, _args| Ok(Value::Null)),
                &[],
            )?
            .type_id();

        let object = self
            .register_type(
                OBJECT,
                TypeDecl::new()
                    .method(INIT_METHOD, |rt, recv, args| {
                        let this = recv.ok_or(RuntimeError::NullReference)?;
                        rt.invoke_super(this, INIT_METHOD, args, OBJECT, None)
                    })
                    .method("equals", |rt, recv, args| {
                        let this = recv.ok_or(RuntimeError::NullReference)?;
                        let that = args.first().cloned().unwrap_or(Value::Null);
                        Ok(Value::Bool(
                            rt.reference_equals(&Value::object(this), &that),
                        ))
                    })
                    .method("hashCode", |rt, recv, _args| {
                        let this = recv.ok_or(RuntimeError::NullReference)?;
                        Ok(Value::Number(rt.hash_code(&Value::object(this))))
                    })
                    .method("toString", |rt, recv, _args| {
                        let this = recv.ok_or(RuntimeError::NullReference)?;
                        rt.display_string(&Value::object(this)).map(Value::Str)
                    }),
                &[root],
            )?
            .type_id();

        let class = self
            .register_type(CLASS, TypeDecl::new(), &[object, root])?
            .type_id();

        // Phase two: patch the provisional descriptors now that the
        // metaclass type exists (its own descriptor included).
        {
            let mut registry = self.inner.registry.borrow_mut();
            registry.patch_metaclass(root, class);
            registry.patch_metaclass(object, class);
            registry.patch_metaclass(class, class);
        }

        // The always-required value and reference types.
        let value_root = self
            .register_type(VALUE_ROOT, TypeDecl::new(), &[root])?
            .type_id();
        for identifier in INTEGRAL_TYPES
            .iter()
            .chain(FLOATING_TYPES.iter())
            .chain([BOOLEAN, CHAR].iter())
        {
            self.register_type(identifier, TypeDecl::new(), &[value_root, root])?;
        }
        for identifier in [STRING, ARRAY, CLASS_CAST_EXCEPTION, NULL_POINTER_EXCEPTION] {
            self.register_type(identifier, TypeDecl::new(), &[object, root])?;
        }

        Ok(())
    }
}
