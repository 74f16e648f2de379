//! Human-readable rendering of merged Node trees, for debugging and
//! interactive inspection. Optional object keys get a `?` suffix.
use super::Node;

pub fn format_node(node: &Node) -> String {
    render(node, 0)
}

fn render(node: &Node, indent: usize) -> String {
    match node {
        Node::Null { count } => format!("Null(count={count})"),
        Node::Bool { count } => format!("Bool(count={count})"),
        Node::Str { count } => format!("Str(count={count})"),
        Node::Int { count, min, max } => {
            let mut args = format!("count={count}");
            if let Some(min) = min {
                args += &format!(", min={min}");
            }
            if let Some(max) = max {
                args += &format!(", max={max}");
            }
            format!("Int({args})")
        }
        Node::Float { count, min, max } => {
            let mut args = format!("count={count}");
            if let Some(min) = min {
                args += &format!(", min={}", min.0);
            }
            if let Some(max) = max {
                args += &format!(", max={}", max.0);
            }
            format!("Float({args})")
        }
        Node::Object { count, keys } => {
            let mut args = format!("count={count}");
            if keys.is_empty() {
                return format!("Object({args})");
            }
            let rendered: Vec<String> = keys
                .iter()
                .map(|(key, child)| {
                    let optional = if child.count() != *count { "?" } else { "" };
                    format!(
                        "{}'{key}{optional}': {}",
                        " ".repeat(indent + 4),
                        render(child, indent + 4)
                    )
                })
                .collect();
            args += &format!(
                ", keys={{\n{}\n{}}}",
                rendered.join(",\n"),
                " ".repeat(indent)
            );
            format!("Object({args})")
        }
        Node::Array { count, element, min_len, max_len } => {
            let mut args = format!("count={count}");
            if let Some(min_len) = min_len {
                args += &format!(", min_len={min_len}");
            }
            if let Some(max_len) = max_len {
                args += &format!(", max_len={max_len}");
            }
            if let Some(element) = element {
                args += &format!(", element={}", render(element, indent));
            }
            format!("Array({args})")
        }
        Node::Union { count, variants } => {
            let mut args = format!("count={count}");
            if variants.is_empty() {
                return format!("Union({args})");
            }
            let rendered: Vec<String> = variants
                .iter()
                .map(|v| format!("{}{}", " ".repeat(indent + 4), render(v, indent + 4)))
                .collect();
            args += &format!(
                ", variants=[\n{}\n{}]",
                rendered.join(",\n"),
                " ".repeat(indent)
            );
            format!("Union({args})")
        }
    }
}
