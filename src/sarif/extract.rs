use crate::core::{AnalysisAlert, Extraction};
use crate::sarif::code_flow::{CodeFlowPolicy, extract_code_flows};
use crate::sarif::location::extract_location;
use crate::sarif::model::{Log, Run, SarifResult};
use crate::sarif::rule::try_get_rule;
use crate::sarif::severity::try_get_severity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub code_flows: CodeFlowPolicy,
}

pub fn extract_analysis_alerts(log: Option<&Log>) -> Extraction {
    extract_analysis_alerts_with(log, &ExtractOptions::default())
}

/// One alert per valid location of each valid result, in input order.
pub fn extract_analysis_alerts_with(log: Option<&Log>, opts: &ExtractOptions) -> Extraction {
    let Some(log) = log else {
        return Extraction {
            alerts: Vec::new(),
            errors: vec!["No SARIF log was found".to_string()],
        };
    };

    let runs = match log.runs.as_deref() {
        Some(runs) if !runs.is_empty() => runs,
        _ => {
            return Extraction {
                alerts: Vec::new(),
                errors: vec!["No runs found in the SARIF file".to_string()],
            };
        }
    };

    let mut out = Extraction::default();
    for run in runs {
        out.absorb(extract_run(run, opts));
    }
    out
}

fn extract_run(run: &Run, opts: &ExtractOptions) -> Extraction {
    let mut out = Extraction::default();

    let results = match run.results.as_deref() {
        Some(results) if !results.is_empty() => results,
        _ => {
            out.errors
                .push("No results found in the SARIF run".to_string());
            return out;
        }
    };

    for result in results {
        out.absorb(extract_result(run, result, opts));
    }
    out
}

fn extract_result(run: &Run, result: &SarifResult, opts: &ExtractOptions) -> Extraction {
    let mut out = Extraction::default();

    let Some(message) = result.message.as_ref().and_then(|m| m.non_empty_text()) else {
        out.errors
            .push("No message found in the SARIF result".to_string());
        return out;
    };

    let severity = try_get_severity(run, result).unwrap_or_default();

    let flows = extract_code_flows(result, opts.code_flows);
    if !flows.errors.is_empty() {
        out.errors.extend(flows.errors);
        return out;
    }

    let locations = match result.locations.as_deref() {
        Some(locations) if !locations.is_empty() => locations,
        _ => {
            out.errors
                .push("No locations found in the SARIF result".to_string());
            return out;
        }
    };

    let short_description = try_get_rule(run, result)
        .and_then(|rule| rule.short_description.as_ref())
        .and_then(|d| d.non_empty_text())
        .unwrap_or(message);

    for location in locations {
        match extract_location(location) {
            Ok(processed) => out.alerts.push(AnalysisAlert {
                message: message.to_string(),
                short_description: short_description.to_string(),
                file_path: processed.file_path,
                severity,
                code_snippet: processed.code_snippet,
                highlighted_region: processed.highlighted_region,
                code_flows: flows.code_flows.clone(),
            }),
            Err(errors) => out.errors.extend(errors),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ResultSeverity;
    use serde_json::json;

    fn log(v: serde_json::Value) -> Log {
        serde_json::from_value(v).expect("log json")
    }

    fn location(uri: &str) -> serde_json::Value {
        json!({
            "physicalLocation": {
                "artifactLocation": { "uri": uri },
                "region": { "startLine": 11, "startColumn": 5, "endColumn": 6 },
                "contextRegion": {
                    "startLine": 10,
                    "endLine": 12,
                    "snippet": { "text": "let x = 1;" }
                }
            }
        })
    }

    #[test]
    fn absent_log_is_one_error() {
        let out = extract_analysis_alerts(None);
        assert!(out.alerts.is_empty());
        assert_eq!(out.errors, vec!["No SARIF log was found"]);
    }

    #[test]
    fn missing_or_empty_runs_is_one_error() {
        for v in [json!({}), json!({ "runs": [] }), json!({ "runs": null })] {
            let out = extract_analysis_alerts(Some(&log(v)));
            assert!(out.alerts.is_empty());
            assert_eq!(out.errors, vec!["No runs found in the SARIF file"]);
        }
    }

    #[test]
    fn result_without_message_is_skipped() {
        let l = log(json!({ "runs": [ { "results": [
            { "locations": [ location("a.rs") ] },
            { "message": { "text": "" }, "locations": [ location("b.rs") ] },
            { "message": { "text": "kept" }, "locations": [ location("c.rs") ] }
        ] } ] }));

        let out = extract_analysis_alerts(Some(&l));
        assert_eq!(out.alerts.len(), 1);
        assert_eq!(out.alerts[0].file_path, "c.rs");
        assert_eq!(out.errors.len(), 2);
    }

    #[test]
    fn result_without_locations_is_skipped() {
        let l = log(json!({ "runs": [ { "results": [
            { "message": { "text": "none" } },
            { "message": { "text": "empty" }, "locations": [] }
        ] } ] }));

        let out = extract_analysis_alerts(Some(&l));
        assert!(out.alerts.is_empty());
        assert_eq!(
            out.errors,
            vec![
                "No locations found in the SARIF result",
                "No locations found in the SARIF result",
            ]
        );
    }

    #[test]
    fn bad_code_flow_drops_whole_result() {
        let l = log(json!({ "runs": [ { "results": [ {
            "message": { "text": "flow" },
            "locations": [ location("a.rs"), location("b.rs") ],
            "codeFlows": [ { "threadFlows": [ { "locations": [ { "location": {
                "physicalLocation": { "artifactLocation": { "uri": "a.rs" } }
            } } ] } ] } ]
        } ] } ] }));

        let out = extract_analysis_alerts(Some(&l));
        assert!(out.alerts.is_empty());
        assert_eq!(
            out.errors,
            vec![
                "No context region found in the SARIF result location",
                "No region found in the SARIF result location",
            ]
        );
    }

    #[test]
    fn short_description_comes_from_rule_when_present() {
        let l = log(json!({ "runs": [ {
            "tool": { "driver": { "rules": [ {
                "id": "js/xss",
                "shortDescription": { "text": "Cross-site scripting" },
                "properties": { "problem.severity": "error" }
            } ] } },
            "results": [ {
                "message": { "text": "User input flows to DOM" },
                "rule": { "id": "js/xss" },
                "locations": [ location("app.js") ]
            } ]
        } ] }));

        let out = extract_analysis_alerts(Some(&l));
        assert!(out.errors.is_empty());
        assert_eq!(out.alerts[0].short_description, "Cross-site scripting");
        assert_eq!(out.alerts[0].severity, ResultSeverity::Error);
    }

    #[test]
    fn code_flow_policy_controls_alert_flows() {
        let l = log(json!({ "runs": [ { "results": [ {
            "message": { "text": "flow" },
            "locations": [ location("a.rs") ],
            "codeFlows": [ { "threadFlows": [ { "locations": [ { "location": location("a.rs") } ] } ] } ]
        } ] } ] }));

        let kept = extract_analysis_alerts(Some(&l));
        assert_eq!(kept.alerts[0].code_flows.len(), 1);
        assert_eq!(kept.alerts[0].code_flows[0].thread_flows.len(), 1);

        let dropped = extract_analysis_alerts_with(
            Some(&l),
            &ExtractOptions {
                code_flows: CodeFlowPolicy::Discard,
            },
        );
        assert_eq!(dropped.alerts.len(), 1);
        assert!(dropped.alerts[0].code_flows.is_empty());
        assert!(dropped.errors.is_empty());
    }
}
