/// Sanitizes an id for use *inside* rendered Mermaid text (spec.md §3
/// invariant 5 / §4.7 step 7): `erDiagram` and `stateDiagram-v2` pass ids
/// through untouched, every other family replaces `-` with `_`. `nodeMap`
/// keys always keep the original, unsanitized id — this is only for what
/// gets written into the Mermaid source.
pub fn sanitize_id(mermaid_type: &str, id: &str) -> String {
    if mermaid_type == "erDiagram" || mermaid_type == "stateDiagram-v2" {
        id.to_owned()
    } else {
        id.replace('-', "_")
    }
}
