//! Executes a mapping's per-element transform scripts (spec.md §4.6
//! TransformRuntime). The retrieved example corpus has no JavaScript engine
//! among its dependency graphs; the closest precedent is `apollo-router`'s
//! Rhai-based request/response transform scripts, so `transforms[].js` runs
//! as a Rhai script body here instead of literal JavaScript (see DESIGN.md).

use serde_json::Value as JsonValue;

/// The `ctx` argument visible to a transform script: everything besides the
/// element itself (`element` is passed as a separate scope variable).
#[derive(Debug, Clone, Default)]
pub struct TransformContext {
    pub all_nodes: Vec<JsonValue>,
    pub all_edges: Vec<JsonValue>,
    pub mapping_id: String,
    /// The output accumulated so far; a script that doesn't return its own
    /// `string[]` falls back to whatever it pushed onto `ctx.output`, and a
    /// script that errors falls back to this value unchanged.
    pub output: Vec<String>,
}

pub struct TransformRuntime {
    engine: rhai::Engine,
}

impl Default for TransformRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformRuntime {
    pub fn new() -> Self {
        let mut engine = rhai::Engine::new();
        engine.set_max_operations(200_000);
        engine.set_max_expr_depth(64);
        Self { engine }
    }

    /// Evaluates `script` as a function of `(element, ctx)`. On any failure —
    /// a Rhai error, or a result that isn't a `string[]` — returns
    /// `ctx.output` unchanged (or as mutated via `ctx.output.push(...)`,
    /// spec.md §4.6's documented fallback).
    pub fn run(&self, script: &str, element: &JsonValue, ctx: TransformContext) -> Vec<String> {
        let fallback = ctx.output.clone();

        let Some(element_dynamic) = rhai::serde::to_dynamic(element).ok() else {
            return fallback;
        };
        let Some(ctx_dynamic) = build_ctx_dynamic(&ctx) else {
            return fallback;
        };

        let mut scope = rhai::Scope::new();
        scope.push("element", element_dynamic);
        scope.push("ctx", ctx_dynamic);

        match self.engine.eval_with_scope::<rhai::Dynamic>(&mut scope, script) {
            Ok(value) => dynamic_to_string_vec(&value).unwrap_or_else(|| {
                scope
                    .get_value::<rhai::Map>("ctx")
                    .and_then(|ctx_map| ctx_map.get("output").cloned())
                    .and_then(|output| dynamic_to_string_vec(&output))
                    .unwrap_or(fallback)
            }),
            Err(_) => fallback,
        }
    }
}

fn build_ctx_dynamic(ctx: &TransformContext) -> Option<rhai::Dynamic> {
    let mut map = rhai::Map::new();
    map.insert("mapping_id".into(), rhai::Dynamic::from(ctx.mapping_id.clone()));
    map.insert("all_nodes".into(), rhai::serde::to_dynamic(&ctx.all_nodes).ok()?);
    map.insert("all_edges".into(), rhai::serde::to_dynamic(&ctx.all_edges).ok()?);
    let output: rhai::Array = ctx.output.iter().cloned().map(rhai::Dynamic::from).collect();
    map.insert("output".into(), rhai::Dynamic::from(output));
    Some(rhai::Dynamic::from(map))
}

fn dynamic_to_string_vec(value: &rhai::Dynamic) -> Option<Vec<String>> {
    let array = value.clone().try_cast::<rhai::Array>()?;
    array.into_iter().map(|item| item.into_string().ok()).collect()
}

/// Runs every transform in `rules` whose `match` clause matches `fields`, in
/// declaration order, and returns the first match's script output. Matches
/// `ConversionEngine`'s "first-match-wins" ordering for a given element.
pub fn apply_first_match<'a>(
    runtime: &TransformRuntime,
    rules: impl IntoIterator<Item = &'a crate::model::TransformRule>,
    scope: crate::model::TransformScope,
    element: &JsonValue,
    fields: &std::collections::HashMap<String, JsonValue>,
    ctx: TransformContext,
) -> Option<Vec<String>> {
    rules
        .into_iter()
        .find(|rule| rule.scope == scope && rule.match_clause.matches(fields))
        .map(|rule| runtime.run(&rule.js, element, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn run_returns_script_array_result() {
        let runtime = TransformRuntime::new();
        let element = json!({ "label": "Begin" });
        let ctx = TransformContext { mapping_id: "flowchart".into(), ..Default::default() };
        let result = runtime.run(r#"["A", "B"]"#, &element, ctx);
        assert_eq!(result, vec!["A".to_owned(), "B".to_owned()]);
    }

    #[test]
    fn run_falls_back_to_ctx_output_on_script_error() {
        let runtime = TransformRuntime::new();
        let element = json!({});
        let ctx = TransformContext { output: vec!["kept".into()], ..Default::default() };
        let result = runtime.run("this is not valid rhai {{{", &element, ctx);
        assert_eq!(result, vec!["kept".to_owned()]);
    }

    #[test]
    fn run_reads_element_fields_in_script() {
        let runtime = TransformRuntime::new();
        let element = json!({ "label": "Begin" });
        let ctx = TransformContext::default();
        let result = runtime.run(r#"[element.label]"#, &element, ctx);
        assert_eq!(result, vec!["Begin".to_owned()]);
    }
}
