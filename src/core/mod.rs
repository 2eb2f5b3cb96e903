mod alert;
mod report;
mod severity;

pub use alert::{AnalysisAlert, CodeFlow, CodeSnippet, HighlightedRegion, ThreadFlow};
pub use report::{AlertReport, AlertSummary, Extraction};
pub use severity::ResultSeverity;
