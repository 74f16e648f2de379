//! JSON-Schema emission for merged Nodes.
use serde_json::{json, Map, Value};

use super::Node;

/// Convert a Node tree into a JSON-Schema-shaped mapping.
///
/// Object keys are `required` only when their occurrence count equals the
/// parent object's (key present in every merged instance). With
/// `include_constraints` off, numeric bounds and array length bounds are
/// omitted.
pub fn to_json_schema(node: &Node, include_constraints: bool) -> Value {
    match node {
        Node::Null { .. } => json!({ "type": "null" }),
        Node::Bool { .. } => json!({ "type": "boolean" }),
        Node::Str { .. } => json!({ "type": "string" }),
        Node::Int { min, max, .. } => {
            let mut schema = json!({ "type": "integer" });
            if include_constraints {
                if let Some(min) = min {
                    schema["minimum"] = json!(min);
                }
                if let Some(max) = max {
                    schema["maximum"] = json!(max);
                }
            }
            schema
        }
        Node::Float { min, max, .. } => {
            let mut schema = json!({ "type": "number" });
            if include_constraints {
                if let Some(min) = min {
                    schema["minimum"] = json!(min.0);
                }
                if let Some(max) = max {
                    schema["maximum"] = json!(max.0);
                }
            }
            schema
        }
        Node::Object { count, keys } => {
            let mut properties = Map::new();
            let mut required: Vec<Value> = Vec::new();
            for (key, child) in keys {
                properties.insert(key.clone(), to_json_schema(child, include_constraints));
                if child.count() == *count {
                    required.push(json!(key));
                }
            }
            let mut schema = json!({ "type": "object", "properties": properties });
            if !required.is_empty() {
                schema["required"] = Value::Array(required);
            }
            schema
        }
        Node::Array { element, min_len, max_len, .. } => {
            let items = match element {
                Some(element) => to_json_schema(element, include_constraints),
                None => json!({}),
            };
            let mut schema = json!({ "type": "array", "items": items });
            if include_constraints {
                if let Some(min_len) = min_len {
                    schema["minItems"] = json!(min_len);
                }
                if let Some(max_len) = max_len {
                    schema["maxItems"] = json!(max_len);
                }
            }
            schema
        }
        Node::Union { variants, .. } => {
            let any_of: Vec<Value> = variants
                .iter()
                .map(|v| to_json_schema(v, include_constraints))
                .collect();
            json!({ "anyOf": any_of })
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
