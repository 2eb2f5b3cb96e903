use crate::core::{AnalysisAlert, ResultSeverity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub alerts: Vec<AnalysisAlert>,
    pub errors: Vec<String>,
}

impl Extraction {
    pub fn absorb(&mut self, other: Extraction) {
        self.alerts.extend(other.alerts);
        self.errors.extend(other.errors);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total: usize,
    pub recommendations: usize,
    pub warnings: usize,
    pub errors: usize,
    pub diagnostics: usize,
    pub filtered: usize,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[AnalysisAlert], diagnostics: usize, filtered: usize) -> Self {
        let mut summary = Self {
            total: alerts.len(),
            diagnostics,
            filtered,
            ..Self::default()
        };
        for alert in alerts {
            match alert.severity {
                ResultSeverity::Recommendation => summary.recommendations += 1,
                ResultSeverity::Warning => summary.warnings += 1,
                ResultSeverity::Error => summary.errors += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertReport {
    pub schema_version: String,
    pub tool_version: String,
    pub generated_at: String,
    pub source: String,
    pub summary: AlertSummary,
    pub alerts: Vec<AnalysisAlert>,
    pub errors: Vec<String>,
}
