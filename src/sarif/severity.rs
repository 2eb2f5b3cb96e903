use crate::core::ResultSeverity;
use crate::sarif::model::{Run, SarifResult};
use crate::sarif::rule::try_get_rule;

pub const SEVERITY_PROPERTY: &str = "problem.severity";

/// `None` when the rule declares no known level. Callers fall back to `Warning`.
pub fn try_get_severity(run: &Run, result: &SarifResult) -> Option<ResultSeverity> {
    let declared = try_get_rule(run, result)?
        .properties
        .as_ref()?
        .get(SEVERITY_PROPERTY)?
        .as_str()?;
    [
        ResultSeverity::Recommendation,
        ResultSeverity::Warning,
        ResultSeverity::Error,
    ]
    .into_iter()
    .find(|level| declared.eq_ignore_ascii_case(level.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run_with_severity(severity: serde_json::Value) -> Run {
        serde_json::from_value(json!({
            "tool": {
                "driver": {
                    "rules": [ { "id": "r", "properties": { "problem.severity": severity } } ]
                }
            }
        }))
        .expect("run json")
    }

    fn referencing_result() -> SarifResult {
        serde_json::from_value(json!({ "rule": { "id": "r" } })).expect("result json")
    }

    #[test]
    fn maps_declared_severity_case_insensitively() {
        for (declared, expected) in [
            ("recommendation", ResultSeverity::Recommendation),
            ("WARNING", ResultSeverity::Warning),
            ("Error", ResultSeverity::Error),
        ] {
            let run = run_with_severity(json!(declared));
            assert_eq!(try_get_severity(&run, &referencing_result()), Some(expected));
        }
    }

    #[test]
    fn unknown_or_missing_severity_is_undetermined() {
        let run = run_with_severity(json!("critical"));
        assert_eq!(try_get_severity(&run, &referencing_result()), None);

        let run = run_with_severity(json!(" error "));
        assert_eq!(try_get_severity(&run, &referencing_result()), None);

        let run = run_with_severity(json!(""));
        assert_eq!(try_get_severity(&run, &referencing_result()), None);

        let run = run_with_severity(json!(3));
        assert_eq!(try_get_severity(&run, &referencing_result()), None);

        let run = Run::default();
        assert_eq!(try_get_severity(&run, &referencing_result()), None);
    }
}
