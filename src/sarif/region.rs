use serde_json::Value;

use crate::core::{CodeSnippet, HighlightedRegion};
use crate::sarif::model::Region;

enum Position {
    Missing,
    Invalid,
    At(u64),
}

// Lines and columns are 1-based positive integers.
fn position(value: Option<&Value>) -> Position {
    match value {
        None | Some(Value::Null) => Position::Missing,
        Some(v) => match v.as_u64() {
            Some(n) if n >= 1 => Position::At(n),
            _ => Position::Invalid,
        },
    }
}

fn require(value: Option<&Value>, what: &str, region: &str, errors: &mut Vec<String>) -> Option<u64> {
    match position(value) {
        Position::At(n) => Some(n),
        Position::Missing => {
            errors.push(format!("No {what} set for a result {region}"));
            None
        }
        Position::Invalid => {
            errors.push(format!("Invalid {what} set for a result {region}"));
            None
        }
    }
}

pub fn check_context_region(region: Option<&Region>) -> Result<CodeSnippet, Vec<String>> {
    let Some(region) = region else {
        return Err(vec![
            "No context region found in the SARIF result location".to_string(),
        ]);
    };

    let mut errors = Vec::new();
    let start_line = require(region.start_line.as_ref(), "start line", "context region", &mut errors);
    let end_line = require(region.end_line.as_ref(), "end line", "context region", &mut errors);
    let text = region
        .snippet
        .as_ref()
        .and_then(|s| s.text.as_deref())
        .filter(|t| !t.is_empty());
    if text.is_none() {
        errors.push("No text set for a result context region".to_string());
    }

    let (Some(start_line), Some(end_line), Some(text)) = (start_line, end_line, text) else {
        return Err(errors);
    };

    if start_line > end_line {
        return Err(vec![
            "Start line is greater than the end line in result context region".to_string(),
        ]);
    }

    Ok(CodeSnippet {
        start_line,
        end_line,
        text: text.to_string(),
    })
}

pub fn check_region(region: Option<&Region>) -> Result<HighlightedRegion, Vec<String>> {
    let Some(region) = region else {
        return Err(vec!["No region found in the SARIF result location".to_string()]);
    };

    let mut errors = Vec::new();
    let start_line = require(region.start_line.as_ref(), "start line", "region", &mut errors);
    let start_column = require(region.start_column.as_ref(), "start column", "region", &mut errors);
    let end_column = require(region.end_column.as_ref(), "end column", "region", &mut errors);
    let end_line = match position(region.end_line.as_ref()) {
        Position::At(n) => Some(n),
        Position::Missing => None,
        Position::Invalid => {
            errors.push("Invalid end line set for a result region".to_string());
            None
        }
    };

    let (Some(start_line), Some(start_column), Some(end_column), true) =
        (start_line, start_column, end_column, errors.is_empty())
    else {
        return Err(errors);
    };

    let end_line = end_line.unwrap_or(start_line);
    if end_line == start_line && end_column < start_column {
        return Err(vec![
            "Start column is greater than the end column in a result region".to_string(),
        ]);
    }

    Ok(HighlightedRegion {
        start_line,
        start_column,
        end_line,
        end_column,
    })
}

pub fn validate_context_region(region: Option<&Region>) -> Vec<String> {
    check_context_region(region).err().unwrap_or_default()
}

pub fn validate_region(region: Option<&Region>) -> Vec<String> {
    check_region(region).err().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sarif::model::ArtifactContent;
    use serde_json::json;

    fn context(start: Option<u64>, end: Option<u64>, text: Option<&str>) -> Region {
        Region {
            start_line: start.map(Value::from),
            end_line: end.map(Value::from),
            snippet: Some(ArtifactContent {
                text: text.map(str::to_string),
            }),
            ..Region::default()
        }
    }

    fn span(line: Option<u64>, start_col: Option<u64>, end_line: Option<u64>, end_col: Option<u64>) -> Region {
        Region {
            start_line: line.map(Value::from),
            start_column: start_col.map(Value::from),
            end_line: end_line.map(Value::from),
            end_column: end_col.map(Value::from),
            snippet: None,
        }
    }

    fn region(v: Value) -> Region {
        serde_json::from_value(v).expect("region json")
    }

    #[test]
    fn missing_context_region_is_a_single_error() {
        let errors = validate_context_region(None);
        assert_eq!(errors, vec!["No context region found in the SARIF result location"]);
    }

    #[test]
    fn each_missing_context_field_gets_its_own_error() {
        let errors = validate_context_region(Some(&context(None, None, None)));
        assert_eq!(
            errors,
            vec![
                "No start line set for a result context region",
                "No end line set for a result context region",
                "No text set for a result context region",
            ]
        );
    }

    #[test]
    fn empty_snippet_text_counts_as_missing() {
        let errors = validate_context_region(Some(&context(Some(1), Some(2), Some(""))));
        assert_eq!(errors, vec!["No text set for a result context region"]);
    }

    #[test]
    fn ordering_is_not_checked_while_fields_are_missing() {
        let errors = validate_context_region(Some(&context(Some(9), Some(3), None)));
        assert_eq!(errors, vec!["No text set for a result context region"]);
    }

    #[test]
    fn inverted_context_lines_are_rejected() {
        let errors = validate_context_region(Some(&context(Some(9), Some(3), Some("x"))));
        assert_eq!(
            errors,
            vec!["Start line is greater than the end line in result context region"]
        );
    }

    #[test]
    fn valid_context_region_yields_snippet() {
        let snippet = check_context_region(Some(&context(Some(10), Some(12), Some("let x = 1;"))))
            .expect("valid context region");
        assert_eq!(
            snippet,
            CodeSnippet {
                start_line: 10,
                end_line: 12,
                text: "let x = 1;".to_string(),
            }
        );
    }

    #[test]
    fn region_end_line_is_optional() {
        let region = check_region(Some(&span(Some(11), Some(5), None, Some(6)))).expect("valid region");
        assert_eq!(region.end_line, 11);
        assert_eq!(region.end_column, 6);
    }

    #[test]
    fn each_missing_region_field_gets_its_own_error() {
        assert_eq!(
            validate_region(Some(&span(None, None, Some(4), None))),
            vec![
                "No start line set for a result region",
                "No start column set for a result region",
                "No end column set for a result region",
            ]
        );
        assert_eq!(
            validate_region(None),
            vec!["No region found in the SARIF result location"]
        );
    }

    #[test]
    fn same_line_columns_must_not_be_inverted() {
        assert_eq!(validate_region(Some(&span(Some(3), Some(8), Some(3), Some(2)))).len(), 1);
        assert_eq!(validate_region(Some(&span(Some(3), Some(8), None, Some(2)))).len(), 1);
        assert!(validate_region(Some(&span(Some(3), Some(8), Some(4), Some(2)))).is_empty());
        assert!(validate_region(Some(&span(Some(3), Some(8), Some(3), Some(8)))).is_empty());
    }

    #[test]
    fn mistyped_positions_are_reported_per_field() {
        let r = region(json!({
            "startLine": 4,
            "startColumn": -1,
            "endLine": "four",
            "endColumn": 2.5
        }));
        assert_eq!(
            validate_region(Some(&r)),
            vec![
                "Invalid start column set for a result region",
                "Invalid end column set for a result region",
                "Invalid end line set for a result region",
            ]
        );

        let c = region(json!({
            "startLine": 0,
            "endLine": null,
            "snippet": { "text": "x" }
        }));
        assert_eq!(
            validate_context_region(Some(&c)),
            vec![
                "Invalid start line set for a result context region",
                "No end line set for a result context region",
            ]
        );
    }
}
