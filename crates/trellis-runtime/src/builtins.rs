//! Value-level builtins backing the object root's methods
//!
//! Reference equality, hash codes, and display strings for host values.
//! Generated code layers user-defined `equals`/`hashCode`/`toString`
//! overrides on top through normal virtual dispatch.

use crate::error::RuntimeError;
use crate::runtime::Runtime;
use crate::value::Value;

const HASH_MODULUS: i64 = 2_147_483_647;

impl Runtime {
    /// Host identity equality: primitives by value, instances by reference.
    pub fn reference_equals(&self, a: &Value, b: &Value) -> bool {
        a == b
    }

    /// Hash code of a value. Instances hash by id, so the code is stable for
    /// the instance's lifetime but not across processes.
    pub fn hash_code(&self, value: &Value) -> f64 {
        match value {
            Value::Null => 0.0,
            Value::Bool(true) => 1231.0,
            Value::Bool(false) => 1237.0,
            Value::Number(n) => (n.round() as i64 % HASH_MODULUS) as f64,
            Value::Str(s) => string_hash(s),
            Value::Tag(tag) => string_hash(&self.tag_text(*tag)),
            Value::Array(items) => {
                let mut code = 0i64;
                for item in items {
                    code = (code * 31 + self.hash_code(item) as i64) % HASH_MODULUS;
                }
                code as f64
            }
            Value::Object(obj) => (obj.id() as i64 % HASH_MODULUS) as f64,
        }
    }

    /// Host rendering of a value. Null is an error: the caller required a
    /// non-null reference to stringify.
    pub fn display_string(&self, value: &Value) -> Result<String, RuntimeError> {
        match value {
            Value::Null => Err(RuntimeError::NullReference),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(render_number(*n)),
            Value::Str(s) => Ok(s.clone()),
            Value::Tag(tag) => Ok(self.tag_text(*tag)),
            Value::Array(items) => {
                let parts: Result<Vec<_>, _> = items
                    .iter()
                    .map(|item| match item {
                        Value::Null => Ok(String::new()),
                        other => self.display_string(other),
                    })
                    .collect();
                Ok(parts?.join(","))
            }
            Value::Object(obj) => Ok(format!(
                "{}@{}",
                self.identifier_of(obj.type_id()),
                obj.id()
            )),
        }
    }
}

fn string_hash(s: &str) -> f64 {
    let mut code = 0i64;
    for ch in s.chars() {
        code = (code * 31 + ch as i64) % HASH_MODULUS;
    }
    code as f64
}

fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
