mod code_flow;
mod extract;
mod load;
mod location;
pub mod model;
mod region;
mod rule;
mod severity;

pub use code_flow::{CodeFlowExtraction, CodeFlowPolicy, extract_code_flows};
pub use extract::{ExtractOptions, extract_analysis_alerts, extract_analysis_alerts_with};
pub use load::{load_log, parse_log};
pub use location::{ProcessedLocation, extract_location};
pub use region::{check_context_region, check_region, validate_context_region, validate_region};
pub use rule::{RuleRef, rule_refs, try_get_rule};
pub use severity::{SEVERITY_PROPERTY, try_get_severity};
