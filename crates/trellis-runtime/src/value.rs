//! Host value model
//!
//! The host is a dynamically typed environment: one number type (f64),
//! strings, booleans, arrays, and runtime instances. Signature tags appear as
//! values only at the generated-code boundary, as the trailing argument of
//! overloaded calls.

use std::rc::Rc;

use crate::intern::SignatureTag;
use crate::object::{Instance, ObjRef};

/// A host value flowing through dispatch, type checks, and serialization.
#[derive(Debug, Clone)]
pub enum Value {
    /// The null/absent reference.
    Null,
    /// Host-native boolean.
    Bool(bool),
    /// Host-native number; the host has a single floating-point number type.
    Number(f64),
    /// Host-native string.
    Str(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Reference to a runtime instance.
    Object(ObjRef),
    /// Overload-variant selector (trailing argument of overloaded calls).
    Tag(SignatureTag),
}

impl Value {
    /// Build a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Build an object value from an instance reference.
    pub fn object(obj: &ObjRef) -> Self {
        Value::Object(Rc::clone(obj))
    }

    /// Whether this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the instance if this is an object value.
    pub fn as_object(&self) -> Option<&ObjRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The number if this is a number value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the string if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The signature tag if this is a tag value.
    pub fn as_tag(&self) -> Option<SignatureTag> {
        match self {
            Value::Tag(tag) => Some(*tag),
            _ => None,
        }
    }

    /// Whether this is a number with no fractional part. Only the shape is
    /// checked; magnitude ranges of the integral source types are not.
    pub fn is_integral_number(&self) -> bool {
        matches!(self, Value::Number(n) if n.fract() == 0.0 && n.is_finite())
    }
}

impl PartialEq for Value {
    /// Host `===` semantics: primitives by value, instances by identity,
    /// arrays never equal (they have no identity in this model).
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Tag(a), Value::Tag(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&ObjRef> for Value {
    fn from(obj: &ObjRef) -> Self {
        Value::Object(Rc::clone(obj))
    }
}

impl From<Rc<Instance>> for Value {
    fn from(obj: Rc<Instance>) -> Self {
        Value::Object(obj)
    }
}
