use crate::cst::YamlValue;
use crate::model::MapHeader;

/// Selects the Mermaid header line for `map.mermaidType` (spec.md §4.7 step
/// 6). ER and state-machine diagrams carry no direction token; every other
/// family does, read from `directionField` in the data when declared, else
/// `defaultDirection`, else `"TD"`.
pub fn header_line(header: &MapHeader, data: &YamlValue) -> String {
    match header.mermaid_type.as_str() {
        "erDiagram" => "erDiagram".to_owned(),
        "stateDiagram-v2" => "stateDiagram-v2".to_owned(),
        other => format!("{other} {}", resolve_direction(header, data)),
    }
}

fn resolve_direction(header: &MapHeader, data: &YamlValue) -> String {
    if let Some(field) = &header.direction_field {
        if let Some(direction) = data.get_path(field).and_then(YamlValue::as_str) {
            return direction.to_owned();
        }
    }
    header.default_direction.clone().unwrap_or_else(|| "TD".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ParsedYaml;
    use rstest::rstest;

    fn header(mermaid_type: &str) -> MapHeader {
        MapHeader {
            id: "x".into(),
            version: 1,
            mermaid_type: mermaid_type.into(),
            direction_field: None,
            default_direction: None,
        }
    }

    // spec.md §8 invariant 5: ER and state headers never carry a direction
    // token; every other family does.
    #[rstest]
    #[case("erDiagram", "erDiagram")]
    #[case("stateDiagram-v2", "stateDiagram-v2")]
    #[case("flowchart", "flowchart TD")]
    #[case("graph", "graph TD")]
    fn header_selection_by_mermaid_type(#[case] mermaid_type: &str, #[case] expected: &str) {
        let doc = ParsedYaml::parse("nodes: {}\n").expect("parse");
        assert_eq!(header_line(&header(mermaid_type), &doc.data), expected);
    }

    #[rstest]
    #[case(None, None, "TD")]
    #[case(Some("meta.direction"), None, "LR")]
    #[case(None, Some("RL"), "RL")]
    fn flowchart_direction_resolution(
        #[case] direction_field: Option<&str>,
        #[case] default_direction: Option<&str>,
        #[case] expected: &str,
    ) {
        let mut h = header("flowchart");
        h.direction_field = direction_field.map(str::to_owned);
        h.default_direction = default_direction.map(str::to_owned).or(Some("TD".to_owned()));
        let doc = ParsedYaml::parse("meta:\n  direction: LR\n").expect("parse");
        assert_eq!(header_line(&h, &doc.data), format!("flowchart {expected}"));
    }
}
