//! Runtime type predicates: `is_instance`, `as_instance`, `class_of`
//!
//! Host-native primitives are mapped onto the source language's numeric,
//! character, and boolean hierarchy. Subtype checks on instances are a direct
//! scan of the descriptor's supertype list, which is already the full
//! transitive closure produced at registration.

use crate::bootstrap::{
    ARRAY, BOOLEAN, CHAR, DOUBLE, FLOATING_TYPES, INT, INTEGRAL_TYPES, OBJECT, ROOT, STRING,
    VALUE_ROOT,
};
use crate::error::RuntimeError;
use crate::registry::TypeId;
use crate::runtime::Runtime;
use crate::value::Value;

impl Runtime {
    /// Whether `t` is `s` or lists `s` in its transitive supertypes.
    pub fn is_subtype(&self, t: TypeId, s: TypeId) -> bool {
        t == s
            || self
                .inner
                .registry
                .borrow()
                .descriptor(t)
                .supertypes
                .contains(&s)
    }

    /// Whether a reference type may hold `value` at runtime.
    ///
    /// Null is never an instance of anything; only `as_instance` gives null
    /// the reference-type exemption.
    pub fn is_instance(&self, value: &Value, target: TypeId) -> bool {
        let target_identifier = self.identifier_of(target);
        let is = |name: &str| target_identifier == name;
        let root = is(ROOT);
        let root_or_value = root || is(VALUE_ROOT);
        let root_or_object = root || is(OBJECT);

        match value {
            Value::Null => false,
            Value::Number(_) => {
                let integral = INTEGRAL_TYPES.contains(&target_identifier.as_str());
                let floating = FLOATING_TYPES.contains(&target_identifier.as_str());
                root_or_value || floating || (integral && value.is_integral_number())
            }
            Value::Bool(_) => root_or_value || is(BOOLEAN),
            Value::Str(s) => root_or_object || is(STRING) || (is(CHAR) && s.chars().count() == 1),
            // Signature tags are strings on the wire and check like them.
            Value::Tag(tag) => {
                let text = self.tag_text(*tag);
                root_or_object || is(STRING) || (is(CHAR) && text.chars().count() == 1)
            }
            Value::Array(_) => root_or_object || is(ARRAY),
            Value::Object(obj) => {
                if root_or_object {
                    return true;
                }
                obj.type_id() == target || self.is_subtype(obj.type_id(), target)
            }
        }
    }

    /// Cast `value` to `target`, returning it unchanged on success.
    ///
    /// Null casts succeed for reference targets (subtypes of the object
    /// root); everything else that fails `is_instance` raises a cast error
    /// naming the actual and requested identifiers.
    pub fn as_instance(&self, value: Value, target: TypeId) -> Result<Value, RuntimeError> {
        if self.is_instance(&value, target) {
            return Ok(value);
        }
        if value.is_null() {
            if let Ok(object) = self.lookup_type(OBJECT) {
                if self.is_subtype(target, object) {
                    return Ok(value);
                }
            }
        }
        Err(RuntimeError::ClassCast {
            actual: self.actual_identifier(&value),
            requested: self.identifier_of(target),
        })
    }

    /// The runtime type of a value. Primitive mapping is best-effort: a
    /// fractionless number reports the default integral type, any other
    /// number the default floating type.
    pub fn class_of(&self, value: &Value) -> Result<TypeId, RuntimeError> {
        let identifier = match value {
            Value::Null => return Err(RuntimeError::NullReference),
            Value::Bool(_) => BOOLEAN,
            Value::Number(_) if value.is_integral_number() => INT,
            Value::Number(_) => DOUBLE,
            Value::Str(_) | Value::Tag(_) => STRING,
            Value::Array(_) => ARRAY,
            Value::Object(obj) => return Ok(obj.type_id()),
        };
        self.lookup_type(identifier)
    }

    /// Identifier describing a value's actual type, for diagnostics.
    pub(crate) fn actual_identifier(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Object(obj) => self.identifier_of(obj.type_id()),
            Value::Bool(_) => BOOLEAN.to_string(),
            Value::Number(_) if value.is_integral_number() => INT.to_string(),
            Value::Number(_) => DOUBLE.to_string(),
            Value::Str(_) | Value::Tag(_) => STRING.to_string(),
            Value::Array(_) => ARRAY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeDecl;
    use crate::runtime::INIT_METHOD;

    fn rt_with_animals() -> (Runtime, TypeId, TypeId) {
        let rt = Runtime::new().unwrap();
        let object = rt.lookup_type(OBJECT).unwrap();
        let animal = rt
            .register_type(
                "demo.Animal",
                TypeDecl::new().method(INIT_METHOD, |_rt, _recv, _args| Ok(Value::Null)),
                &rt.linearization(object),
            )
            .unwrap()
            .type_id();
        let dog = rt
            .register_type("demo.Dog", TypeDecl::new(), &rt.linearization(animal))
            .unwrap()
            .type_id();
        (rt, animal, dog)
    }

    #[test]
    fn test_reflexivity_and_transitivity() {
        let (rt, animal, dog) = rt_with_animals();
        let pet = rt.construct(dog, &[]).unwrap();
        let v = Value::object(&pet);

        assert!(rt.is_instance(&v, dog));
        assert!(rt.is_instance(&v, animal));
        assert!(rt.is_instance(&v, rt.lookup_type(OBJECT).unwrap()));
        assert!(rt.is_instance(&v, rt.lookup_type(ROOT).unwrap()));
    }

    #[test]
    fn test_unrelated_instance_is_rejected() {
        let (rt, animal, _dog) = rt_with_animals();
        let object = rt.lookup_type(OBJECT).unwrap();
        let stone = rt
            .register_type(
                "demo.Stone",
                TypeDecl::new().method(INIT_METHOD, |_rt, _recv, _args| Ok(Value::Null)),
                &rt.linearization(object),
            )
            .unwrap()
            .construct(&[])
            .unwrap();

        assert!(!rt.is_instance(&Value::object(&stone), animal));
    }

    #[test]
    fn test_root_universality_for_primitives() {
        let rt = Runtime::new().unwrap();
        let root = rt.lookup_type(ROOT).unwrap();

        for v in [
            Value::Number(1.5),
            Value::Bool(true),
            Value::str("hi"),
            Value::Array(vec![]),
        ] {
            assert!(rt.is_instance(&v, root));
        }
        assert!(!rt.is_instance(&Value::Null, root));
    }

    #[test]
    fn test_numeric_rules() {
        let rt = Runtime::new().unwrap();
        let int = rt.lookup_type("scala.Int").unwrap();
        let byte = rt.lookup_type("scala.Byte").unwrap();
        let double = rt.lookup_type("scala.Double").unwrap();
        let value_root = rt.lookup_type(VALUE_ROOT).unwrap();

        assert!(rt.is_instance(&Value::Number(42.0), int));
        // Membership is inclusive of the narrowest integral type.
        assert!(rt.is_instance(&Value::Number(42.0), byte));
        assert!(!rt.is_instance(&Value::Number(42.5), int));
        assert!(rt.is_instance(&Value::Number(42.5), double));
        assert!(rt.is_instance(&Value::Number(42.5), value_root));

        let string = rt.lookup_type(STRING).unwrap();
        assert!(!rt.is_instance(&Value::Number(42.0), string));
    }

    #[test]
    fn test_string_and_char_rules() {
        let rt = Runtime::new().unwrap();
        let string = rt.lookup_type(STRING).unwrap();
        let ch = rt.lookup_type(CHAR).unwrap();
        let object = rt.lookup_type(OBJECT).unwrap();

        assert!(rt.is_instance(&Value::str("hi"), string));
        assert!(rt.is_instance(&Value::str("hi"), object));
        assert!(!rt.is_instance(&Value::str("hi"), ch));
        assert!(rt.is_instance(&Value::str("h"), ch));
    }

    #[test]
    fn test_boolean_rules() {
        let rt = Runtime::new().unwrap();
        let boolean = rt.lookup_type(BOOLEAN).unwrap();
        let value_root = rt.lookup_type(VALUE_ROOT).unwrap();
        let string = rt.lookup_type(STRING).unwrap();

        assert!(rt.is_instance(&Value::Bool(false), boolean));
        assert!(rt.is_instance(&Value::Bool(false), value_root));
        assert!(!rt.is_instance(&Value::Bool(false), string));
    }

    #[test]
    fn test_cast_failure_names_both_types() {
        let rt = Runtime::new().unwrap();
        let string = rt.lookup_type(STRING).unwrap();

        let err = rt.as_instance(Value::Number(42.0), string).unwrap_err();
        match err {
            RuntimeError::ClassCast { actual, requested } => {
                assert_eq!(actual, "scala.Int");
                assert_eq!(requested, STRING);
            }
            other => panic!("expected ClassCast, got {other:?}"),
        }
    }

    #[test]
    fn test_null_casts() {
        let rt = Runtime::new().unwrap();
        let string = rt.lookup_type(STRING).unwrap();
        let int = rt.lookup_type("scala.Int").unwrap();

        // Reference-type null is valid and passes through unchanged.
        assert!(rt.as_instance(Value::Null, string).unwrap().is_null());
        // Value-type null is not.
        let err = rt.as_instance(Value::Null, int).unwrap_err();
        assert!(matches!(err, RuntimeError::ClassCast { .. }));
    }

    #[test]
    fn test_class_of_primitive_mapping() {
        let rt = Runtime::new().unwrap();

        assert_eq!(
            rt.class_of(&Value::Bool(true)).unwrap(),
            rt.lookup_type(BOOLEAN).unwrap()
        );
        assert_eq!(
            rt.class_of(&Value::Number(7.0)).unwrap(),
            rt.lookup_type(INT).unwrap()
        );
        assert_eq!(
            rt.class_of(&Value::Number(7.5)).unwrap(),
            rt.lookup_type(DOUBLE).unwrap()
        );
        assert_eq!(
            rt.class_of(&Value::str("x")).unwrap(),
            rt.lookup_type(STRING).unwrap()
        );
        assert!(matches!(
            rt.class_of(&Value::Null),
            Err(RuntimeError::NullReference)
        ));
    }
}
