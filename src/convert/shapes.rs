/// Built-in flowchart shape templates used when `mapping.nodeShapes.shapes`
/// doesn't define the node's shape (spec.md §4.7 new detail). Anything else
/// still falls back further to the spec's bare `<id>["<label>"]`.
pub fn builtin_template(shape: &str) -> Option<&'static str> {
    match shape {
        "rectangle" => Some(r#"["{label}"]"#),
        "stadium" => Some(r#"(["{label}"])"#),
        "subroutine" => Some(r#"[["{label}"]]"#),
        "circle" => Some(r#"(("{label}"))"#),
        _ => None,
    }
}

pub const FALLBACK_TEMPLATE: &str = r#"["{label}"]"#;

/// Resolves the shape suffix for `shape`: the mapping's own template, else a
/// built-in one, else the bare fallback. The full emitted line is `<id>` with
/// this suffix appended, `{label}`/`{id}` substituted.
pub fn resolve_template<'a>(shapes: &'a std::collections::HashMap<String, String>, shape: &str) -> &'a str {
    shapes.get(shape).map(String::as_str).or_else(|| builtin_template(shape)).unwrap_or(FALLBACK_TEMPLATE)
}
