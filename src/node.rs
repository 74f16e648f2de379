//! Tagged-variant value model for schema inference.
//!
//! Every observed JSON value is summarized as a `Node`: one closed variant
//! per JSON kind, each carrying an occurrence count plus whatever sufficient
//! statistics that kind needs (numeric bounds, array length bounds, per-key
//! children). Heterogeneous observations widen to `Union`.
//!
//! Nodes are produced only here (`node_from_value`) and by `merge::merge_nodes`;
//! treat every returned Node as freshly owned.
pub mod merge;
pub mod schema;
pub mod format;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde_json::Value;

use self::merge::merge_nodes;

// ------------------------------- Model ------------------------------------ //

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Null {
        count: u64,
    },
    Bool {
        count: u64,
    },
    /// Integers keep inclusive bounds across every merged instance.
    Int {
        count: u64,
        min: Option<i64>,
        max: Option<i64>,
    },
    /// Floats are a distinct kind from integers; `1` and `1.0` never unify.
    Float {
        count: u64,
        min: Option<OrderedFloat<f64>>,
        max: Option<OrderedFloat<f64>>,
    },
    Str {
        count: u64,
    },
    /// A key is present if observed in at least one merged instance; its own
    /// count may stay below the object count (key absent in some instances).
    Object {
        count: u64,
        keys: IndexMap<String, Node>,
    },
    /// `element` is the merge of all elements across all observed arrays;
    /// `None` when every observed array was empty.
    Array {
        count: u64,
        element: Option<Box<Node>>,
        min_len: Option<u64>,
        max_len: Option<u64>,
    },
    /// At most one variant per kind, in first-seen order.
    Union {
        count: u64,
        variants: Vec<Node>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Object,
    Array,
    Union,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null { .. } => NodeKind::Null,
            Node::Bool { .. } => NodeKind::Bool,
            Node::Int { .. } => NodeKind::Int,
            Node::Float { .. } => NodeKind::Float,
            Node::Str { .. } => NodeKind::Str,
            Node::Object { .. } => NodeKind::Object,
            Node::Array { .. } => NodeKind::Array,
            Node::Union { .. } => NodeKind::Union,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            Node::Null { count }
            | Node::Bool { count }
            | Node::Int { count, .. }
            | Node::Float { count, .. }
            | Node::Str { count }
            | Node::Object { count, .. }
            | Node::Array { count, .. }
            | Node::Union { count, .. } => *count,
        }
    }
}

// ----------------------------- Constructor -------------------------------- //

/// Convert one concrete JSON value into a singleton Node (count = 1).
///
/// Objects recurse per key (insertion order preserved); array elements are
/// folded left-to-right through the merger, so `[1, "a"]` already yields a
/// union element. Unions are never produced directly at the top level.
///
/// `serde_json::Value` is exactly the supported kind set, so this is total.
/// The one representational gap: integers above `i64::MAX` fall back to the
/// float variant (exact count, approximate bounds).
pub fn node_from_value(value: &Value) -> Node {
    match value {
        Value::Null => Node::Null { count: 1 },
        Value::Bool(_) => Node::Bool { count: 1 },
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Int { count: 1, min: Some(i), max: Some(i) }
            } else {
                // u64 beyond i64::MAX, or a float
                let f = OrderedFloat(n.as_f64().unwrap_or_default());
                Node::Float { count: 1, min: Some(f), max: Some(f) }
            }
        }
        Value::String(_) => Node::Str { count: 1 },
        Value::Object(map) => {
            let keys = map
                .iter()
                .map(|(k, v)| (k.clone(), node_from_value(v)))
                .collect();
            Node::Object { count: 1, keys }
        }
        Value::Array(items) => {
            let mut element: Option<Node> = None;
            for item in items {
                let item_node = node_from_value(item);
                element = Some(match element {
                    None => item_node,
                    Some(acc) => merge_nodes(acc, item_node),
                });
            }
            let len = items.len() as u64;
            Node::Array {
                count: 1,
                element: element.map(Box::new),
                min_len: Some(len),
                max_len: Some(len),
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
