//! Cycle-safe object-graph serializer for the remote-call boundary
//!
//! Produces the `{ "$value": V, "$objects": [O...] }` wire document.
//! Non-singleton instances are deduplicated by identity and addressed with
//! small sequence ids assigned in first-visit order; singletons are addressed
//! by type identifier and never enter `$objects`. Every instance is memoized
//! before its fields are visited, so arbitrarily cyclic graphs terminate.

use rustc_hash::FxHashMap;
use serde_json::{json, Map, Value as Json};

use crate::error::RuntimeError;
use crate::object::ObjRef;
use crate::runtime::Runtime;
use crate::value::Value;

impl Runtime {
    /// Serialize a value graph to wire text.
    ///
    /// Sequence ids are unique within this call only; they are not stable
    /// across calls.
    pub fn serialize(&self, value: &Value) -> Result<String, RuntimeError> {
        let mut graph = GraphSerializer {
            runtime: self,
            visited: FxHashMap::default(),
            objects: Vec::new(),
            next_id: 0,
        };
        let root = graph.value(value);
        let doc = json!({ "$value": root, "$objects": graph.objects });
        serde_json::to_string(&doc).map_err(|e| RuntimeError::NotSerializable(e.to_string()))
    }
}

/// State for one `serialize` call. Owned exclusively by that call; nothing is
/// shared across calls.
struct GraphSerializer<'rt> {
    runtime: &'rt Runtime,
    /// Instance id -> assigned sequence id.
    visited: FxHashMap<u64, u64>,
    /// Completed `$objects` records.
    objects: Vec<Json>,
    next_id: u64,
}

impl GraphSerializer<'_> {
    fn value(&mut self, value: &Value) -> Json {
        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => json!(*n),
            Value::Str(s) => Json::String(s.clone()),
            Value::Tag(tag) => Json::String(self.runtime.tag_text(*tag)),
            Value::Array(items) => Json::Array(items.iter().map(|item| self.value(item)).collect()),
            Value::Object(obj) => self.reference(obj),
        }
    }

    fn reference(&mut self, obj: &ObjRef) -> Json {
        let descriptor = self.runtime.descriptor(obj.type_id());
        if descriptor.is_singleton {
            return json!({ "$ref": descriptor.identifier });
        }

        if let Some(&seq) = self.visited.get(&obj.id()) {
            return json!({ "$ref": seq });
        }

        let seq = self.next_id;
        self.next_id += 1;
        // Memoized before the fields are visited; cycles hit the table above.
        self.visited.insert(obj.id(), seq);
        self.record(obj, seq, &descriptor.identifier);
        json!({ "$ref": seq })
    }

    fn record(&mut self, obj: &ObjRef, seq: u64, identifier: &str) {
        let mut record = Map::new();
        record.insert("$id".to_string(), json!(seq));
        record.insert("$type".to_string(), Json::String(identifier.to_string()));
        for (name, value) in obj.fields_snapshot() {
            let serialized = self.value(&value);
            record.insert(name, serialized);
        }
        self.objects.push(Json::Object(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::OBJECT;
    use crate::registry::{TypeDecl, TypeId};
    use crate::runtime::INIT_METHOD;

    fn register_node(rt: &Runtime) -> TypeId {
        let object = rt.lookup_type(OBJECT).unwrap();
        rt.register_type(
            "demo.Node",
            TypeDecl::new().method(INIT_METHOD, |_rt, _recv, _args| Ok(Value::Null)),
            &rt.linearization(object),
        )
        .unwrap()
        .type_id()
    }

    fn parse(rt: &Runtime, value: &Value) -> Json {
        serde_json::from_str(&rt.serialize(value).unwrap()).unwrap()
    }

    #[test]
    fn test_primitives_pass_through() {
        let rt = Runtime::new().unwrap();
        let doc = parse(&rt, &Value::Number(42.0));
        assert_eq!(doc["$value"], json!(42.0));
        assert_eq!(doc["$objects"], json!([]));

        let doc = parse(&rt, &Value::Array(vec![Value::Bool(true), Value::str("x")]));
        assert_eq!(doc["$value"], json!([true, "x"]));
    }

    #[test]
    fn test_instance_record_shape() {
        let rt = Runtime::new().unwrap();
        let node = register_node(&rt);
        let obj = rt.construct(node, &[]).unwrap();
        obj.set_field("label", Value::str("a"));

        let doc = parse(&rt, &Value::object(&obj));
        assert_eq!(doc["$value"], json!({ "$ref": 0 }));
        let objects = doc["$objects"].as_array().unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["$id"], json!(0));
        assert_eq!(objects[0]["$type"], json!("demo.Node"));
        assert_eq!(objects[0]["label"], json!("a"));
    }

    #[test]
    fn test_shared_instance_is_deduplicated() {
        let rt = Runtime::new().unwrap();
        let node = register_node(&rt);
        let shared = rt.construct(node, &[]).unwrap();
        let parent = rt.construct(node, &[]).unwrap();
        parent.set_field("left", Value::object(&shared));
        parent.set_field("right", Value::object(&shared));

        let doc = parse(&rt, &Value::object(&parent));
        let objects = doc["$objects"].as_array().unwrap();
        assert_eq!(objects.len(), 2);

        let parent_record = objects
            .iter()
            .find(|o| o["$id"] == doc["$value"]["$ref"])
            .unwrap();
        assert_eq!(parent_record["left"], parent_record["right"]);
    }

    #[test]
    fn test_cycle_terminates_with_one_record_each() {
        let rt = Runtime::new().unwrap();
        let node = register_node(&rt);
        let a = rt.construct(node, &[]).unwrap();
        let b = rt.construct(node, &[]).unwrap();
        a.set_field("peer", Value::object(&b));
        b.set_field("peer", Value::object(&a));

        let doc = parse(&rt, &Value::object(&a));
        let objects = doc["$objects"].as_array().unwrap();
        assert_eq!(objects.len(), 2);

        let a_record = objects.iter().find(|o| o["$id"] == json!(0)).unwrap();
        let b_record = objects.iter().find(|o| o["$id"] == json!(1)).unwrap();
        assert_eq!(a_record["peer"], json!({ "$ref": 1 }));
        assert_eq!(b_record["peer"], json!({ "$ref": 0 }));
    }

    #[test]
    fn test_singleton_is_addressed_by_identifier() {
        let rt = Runtime::new().unwrap();
        let object = rt.lookup_type(OBJECT).unwrap();
        let supers = rt.linearization(object);
        let singleton = rt
            .register_singleton("demo.Registry$", TypeDecl::new(), &supers, None)
            .unwrap();
        let instance = singleton.get().unwrap();

        let doc = parse(&rt, &Value::object(&instance));
        assert_eq!(doc["$value"], json!({ "$ref": "demo.Registry$" }));
        assert_eq!(doc["$objects"], json!([]));
    }

    #[test]
    fn test_sequence_ids_restart_per_call() {
        let rt = Runtime::new().unwrap();
        let node = register_node(&rt);
        let obj = rt.construct(node, &[]).unwrap();

        let first = parse(&rt, &Value::object(&obj));
        let second = parse(&rt, &Value::object(&obj));
        assert_eq!(first["$value"], json!({ "$ref": 0 }));
        assert_eq!(second["$value"], json!({ "$ref": 0 }));
    }
}
