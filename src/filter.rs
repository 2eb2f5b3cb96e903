use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::core::{AnalysisAlert, ResultSeverity};

#[derive(Debug, Clone)]
pub struct AlertFilter {
    exclude: GlobSet,
    min_severity: Option<ResultSeverity>,
}

impl AlertFilter {
    pub fn new(exclude: &[String], min_severity: Option<ResultSeverity>) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in exclude {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid exclude pattern: {pattern}"))?;
            builder.add(glob);
        }
        Ok(Self {
            exclude: builder.build().context("failed to build exclude patterns")?,
            min_severity,
        })
    }

    pub fn keeps(&self, alert: &AnalysisAlert) -> bool {
        if let Some(min) = self.min_severity {
            if alert.severity < min {
                return false;
            }
        }
        !self.exclude.is_match(alert.file_path.as_str())
    }

    pub fn apply(&self, alerts: Vec<AnalysisAlert>) -> (Vec<AnalysisAlert>, usize) {
        let before = alerts.len();
        let kept: Vec<AnalysisAlert> = alerts.into_iter().filter(|a| self.keeps(a)).collect();
        let dropped = before - kept.len();
        (kept, dropped)
    }
}
