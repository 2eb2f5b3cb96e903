use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::sarif::model::Log;

/// Reads from stdin when `path` is `-`.
pub fn load_log(path: &Path) -> Result<Log> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .lock()
            .read_to_string(&mut buf)
            .context("failed to read SARIF log from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read SARIF log: {}", path.display()))?
    };
    parse_log(&text).with_context(|| format!("failed to parse SARIF log: {}", path.display()))
}

pub fn parse_log(text: &str) -> Result<Log> {
    let log: Log = serde_json::from_str(text).context("SARIF log is not valid JSON for the SARIF shape")?;
    Ok(log)
}
