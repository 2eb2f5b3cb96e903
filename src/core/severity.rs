use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ResultSeverity {
    Recommendation,
    #[default]
    Warning,
    Error,
}

impl ResultSeverity {
    pub const fn as_str(self) -> &'static str {
        match self {
            ResultSeverity::Recommendation => "Recommendation",
            ResultSeverity::Warning => "Warning",
            ResultSeverity::Error => "Error",
        }
    }
}

impl fmt::Display for ResultSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recommendation" => Ok(ResultSeverity::Recommendation),
            "warning" => Ok(ResultSeverity::Warning),
            "error" => Ok(ResultSeverity::Error),
            _ => Err(format!(
                "invalid severity: {s} (expected recommendation|warning|error)"
            )),
        }
    }
}
