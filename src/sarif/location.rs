use crate::core::{CodeSnippet, HighlightedRegion};
use crate::sarif::model::Location;
use crate::sarif::region::{check_context_region, check_region};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedLocation {
    pub message: Option<String>,
    pub file_path: String,
    pub code_snippet: CodeSnippet,
    pub highlighted_region: HighlightedRegion,
}

pub fn extract_location(location: &Location) -> Result<ProcessedLocation, Vec<String>> {
    let physical = location.physical_location.as_ref();

    let mut errors = Vec::new();
    let code_snippet = check_context_region(physical.and_then(|p| p.context_region.as_ref()))
        .map_err(|e| errors.extend(e))
        .ok();
    let highlighted_region = check_region(physical.and_then(|p| p.region.as_ref()))
        .map_err(|e| errors.extend(e))
        .ok();
    let file_path = physical
        .and_then(|p| p.artifact_location.as_ref())
        .and_then(|a| a.uri.as_deref())
        .filter(|uri| !uri.is_empty());
    if file_path.is_none() {
        errors.push("No file path found in the SARIF result location".to_string());
    }

    match (code_snippet, highlighted_region, file_path) {
        (Some(code_snippet), Some(highlighted_region), Some(file_path)) => Ok(ProcessedLocation {
            message: location
                .message
                .as_ref()
                .and_then(|m| m.text.clone()),
            file_path: file_path.to_string(),
            code_snippet,
            highlighted_region,
        }),
        _ => Err(errors),
    }
}
