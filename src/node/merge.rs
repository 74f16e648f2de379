//! Binary join over Nodes.
//!
//! `merge_nodes(a, b)` produces the least general Node subsuming both inputs,
//! widening to a union when kinds are incompatible. The join is associative,
//! and commutative at the level of the represented value set; union variant
//! order is first-seen, so only the representation depends on argument order.
//!
//! Count conservation: every merged node's count is the sum of its inputs',
//! recursively.
use indexmap::IndexMap;

use super::Node;

pub fn merge_nodes(a: Node, b: Node) -> Node {
    match (a, b) {
        // same leaf kind: counts sum, no other payload
        (Node::Null { count: ca }, Node::Null { count: cb }) => Node::Null { count: ca + cb },
        (Node::Bool { count: ca }, Node::Bool { count: cb }) => Node::Bool { count: ca + cb },
        (Node::Str { count: ca }, Node::Str { count: cb }) => Node::Str { count: ca + cb },

        // numeric kinds: bounds combine, preferring the defined side
        (
            Node::Int { count: ca, min: min_a, max: max_a },
            Node::Int { count: cb, min: min_b, max: max_b },
        ) => Node::Int {
            count: ca + cb,
            min: merge_opt(min_a, min_b, i64::min),
            max: merge_opt(max_a, max_b, i64::max),
        },
        (
            Node::Float { count: ca, min: min_a, max: max_a },
            Node::Float { count: cb, min: min_b, max: max_b },
        ) => Node::Float {
            count: ca + cb,
            min: merge_opt(min_a, min_b, |x, y| x.min(y)),
            max: merge_opt(max_a, max_b, |x, y| x.max(y)),
        },

        // objects: union of key names; shared keys merge recursively,
        // one-sided keys carry over unchanged (their count stays below the
        // parent count, which export reads as "optional")
        (
            Node::Object { count: ca, keys: keys_a },
            Node::Object { count: cb, keys: keys_b },
        ) => Node::Object {
            count: ca + cb,
            keys: merge_keys(keys_a, keys_b),
        },

        // arrays: element join with absence propagating, length bounds combine
        (
            Node::Array { count: ca, element: el_a, min_len: min_a, max_len: max_a },
            Node::Array { count: cb, element: el_b, min_len: min_b, max_len: max_b },
        ) => Node::Array {
            count: ca + cb,
            element: merge_opt(el_a, el_b, |x, y| Box::new(merge_nodes(*x, *y))),
            min_len: merge_opt(min_a, min_b, u64::min),
            max_len: merge_opt(max_a, max_b, u64::max),
        },

        // unions flatten the other side in, variant-by-kind
        (
            Node::Union { count: ca, variants: va },
            Node::Union { count: cb, variants: vb },
        ) => {
            let mut variants = va;
            for v in vb {
                add_or_merge(&mut variants, v);
            }
            Node::Union { count: ca + cb, variants }
        }
        (Node::Union { count: ca, variants: mut va }, other) => {
            let cb = other.count();
            add_or_merge(&mut va, other);
            Node::Union { count: ca + cb, variants: va }
        }
        (other, Node::Union { count: cb, variants: mut vb }) => {
            let ca = other.count();
            add_or_merge(&mut vb, other);
            Node::Union { count: ca + cb, variants: vb }
        }

        // incompatible kinds widen to a fresh union, first-seen order
        (a, b) => Node::Union {
            count: a.count() + b.count(),
            variants: vec![a, b],
        },
    }
}

/// Combine two optionals, preferring the defined side when only one exists.
fn merge_opt<T>(a: Option<T>, b: Option<T>, merge: impl FnOnce(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) => Some(merge(x, y)),
        (some, None) | (None, some) => some,
    }
}

/// Fold `other` into an existing variant of the same kind, or append it.
/// Kinds are never duplicated inside a union.
fn add_or_merge(variants: &mut Vec<Node>, other: Node) {
    match variants.iter().position(|v| v.kind() == other.kind()) {
        Some(i) => {
            let existing = std::mem::replace(&mut variants[i], Node::Null { count: 0 });
            variants[i] = merge_nodes(existing, other);
        }
        None => variants.push(other),
    }
}

fn merge_keys(keys_a: IndexMap<String, Node>, mut keys_b: IndexMap<String, Node>) -> IndexMap<String, Node> {
    let mut merged = IndexMap::with_capacity(keys_a.len() + keys_b.len());
    for (name, ours) in keys_a {
        match keys_b.shift_remove(&name) {
            Some(theirs) => merged.insert(name, merge_nodes(ours, theirs)),
            None => merged.insert(name, ours),
        };
    }
    // keys only the right side observed
    for (name, theirs) in keys_b {
        merged.insert(name, theirs);
    }
    merged
}

// ------------------------------- Tests ------------------------------------ //
