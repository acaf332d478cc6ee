//! Indented text rendering of a schema tree.

use tagschema::SchemaNode;

/// Render `schema` one node per line, children indented under their parent.
///
/// ```text
/// people: mapping
///   name: string
///   rating: integer [range] (optional)
/// ```
pub fn render(schema: &SchemaNode) -> String {
    let mut out = String::new();
    line(&mut out, schema, 0);
    out
}

fn line(out: &mut String, node: &SchemaNode, depth: usize) {
    let name = if node.name.is_empty() { "<unnamed>" } else { &node.name };
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("{name}: {}", node.schema_type.name()));
    if let Some(validator) = &node.validator {
        out.push_str(&format!(" [{}]", validator.kind()));
    }
    if !node.is_required() {
        out.push_str(" (optional)");
    }
    if let Some(widget) = &node.widget {
        out.push_str(&format!(" <{}>", widget.kind.as_str()));
    }
    out.push('\n');
    for child in &node.children {
        line(out, child, depth + 1);
    }
}
