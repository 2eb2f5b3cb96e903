use crate::core::{CodeFlow, ThreadFlow};
use crate::sarif::location::extract_location;
use crate::sarif::model::SarifResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `Discard` keeps the diagnostics but drops the extracted flows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeFlowPolicy {
    #[default]
    Preserve,
    Discard,
}

impl CodeFlowPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            CodeFlowPolicy::Preserve => "preserve",
            CodeFlowPolicy::Discard => "discard",
        }
    }
}

impl fmt::Display for CodeFlowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeFlowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(CodeFlowPolicy::Preserve),
            "discard" => Ok(CodeFlowPolicy::Discard),
            _ => Err(format!(
                "invalid code flow policy: {s} (expected preserve|discard)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeFlowExtraction {
    pub code_flows: Vec<CodeFlow>,
    pub errors: Vec<String>,
}

pub fn extract_code_flows(result: &SarifResult, policy: CodeFlowPolicy) -> CodeFlowExtraction {
    let mut out = CodeFlowExtraction::default();

    for code_flow in result.code_flows.iter().flatten() {
        let mut thread_flows = Vec::new();

        let steps = code_flow
            .thread_flows
            .iter()
            .flatten()
            .flat_map(|tf| tf.locations.iter().flatten());
        for step in steps {
            let Some(location) = step.location.as_ref() else {
                out.errors
                    .push("No location found in a thread flow step".to_string());
                continue;
            };
            match extract_location(location) {
                Ok(processed) => thread_flows.push(ThreadFlow {
                    file_path: processed.file_path,
                    code_snippet: processed.code_snippet,
                    highlighted_region: processed.highlighted_region,
                    message: processed.message,
                }),
                Err(errors) => out.errors.extend(errors),
            }
        }

        out.code_flows.push(CodeFlow { thread_flows });
    }

    if policy == CodeFlowPolicy::Discard {
        out.code_flows.clear();
    }
    out
}
