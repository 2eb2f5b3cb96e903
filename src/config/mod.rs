use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::ResultSeverity;
use crate::sarif::CodeFlowPolicy;
use crate::validator::DocumentValidator;

const CONFIG_SCHEMA: &str = include_str!("schema.json");

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub ui: UiConfig,
    pub extract: ExtractConfig,
    pub filter: FilterConfig,
    pub report: ReportConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
    pub max_table_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractConfig {
    pub code_flows: CodeFlowPolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterConfig {
    pub exclude: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_severity: Option<ResultSeverity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportConfig {
    pub include_code_flows: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            ui: UiConfig {
                color: true,
                max_table_rows: 20,
            },
            extract: ExtractConfig {
                code_flows: CodeFlowPolicy::Preserve,
            },
            filter: FilterConfig {
                exclude: Vec::new(),
                min_severity: None,
            },
            report: ReportConfig {
                include_code_flows: false,
            },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    ui: Option<RawUiConfig>,
    extract: Option<RawExtractConfig>,
    filter: Option<RawFilterConfig>,
    report: Option<RawReportConfig>,
}

#[derive(Debug, Deserialize)]
struct RawUiConfig {
    color: Option<bool>,
    max_table_rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawExtractConfig {
    code_flows: Option<CodeFlowPolicy>,
}

#[derive(Debug, Deserialize)]
struct RawFilterConfig {
    exclude: Option<Vec<String>>,
    min_severity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawReportConfig {
    include_code_flows: Option<bool>,
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/sarif-alerts/config.toml")
}

pub fn schema() -> Result<serde_json::Value> {
    serde_json::from_str(CONFIG_SCHEMA).context("embedded config schema is not valid JSON")
}

pub fn load(config_path: Option<&Path>, home_dir: Option<&Path>) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .or_else(|| home_dir.map(default_config_path));

    if let Some(path) = path.filter(|p| p.exists()) {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw = parse_validated(&s)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        apply_raw_config(&mut cfg, raw)?;
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn parse_validated(s: &str) -> Result<RawConfig> {
    let doc: toml::Value = toml::from_str(s).context("failed to parse config file (TOML)")?;
    let json = serde_json::to_value(&doc).context("failed to convert config for validation")?;

    let validator = DocumentValidator::new(&schema()?)?;
    let errors = validator.validate(&json);
    if !errors.is_empty() {
        return Err(anyhow::anyhow!(
            "config does not match its schema:\n  {}",
            errors.join("\n  ")
        ));
    }

    RawConfig::deserialize(doc).context("failed to read config values")
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) -> Result<()> {
    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
        if let Some(max_table_rows) = ui.max_table_rows {
            cfg.ui.max_table_rows = max_table_rows;
        }
    }

    if let Some(extract) = raw.extract {
        if let Some(code_flows) = extract.code_flows {
            cfg.extract.code_flows = code_flows;
        }
    }

    if let Some(filter) = raw.filter {
        if let Some(exclude) = filter.exclude {
            cfg.filter.exclude = exclude;
        }
        if let Some(min_severity) = filter.min_severity {
            cfg.filter.min_severity = Some(
                min_severity
                    .parse::<ResultSeverity>()
                    .map_err(anyhow::Error::msg)?,
            );
        }
    }

    if let Some(report) = raw.report {
        if let Some(include_code_flows) = report.include_code_flows {
            cfg.report.include_code_flows = include_code_flows;
        }
    }

    Ok(())
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("SARIF_ALERTS_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "SARIF_ALERTS_UI_COLOR")?;
    }
    if let Ok(v) = std::env::var("SARIF_ALERTS_UI_MAX_TABLE_ROWS") {
        cfg.ui.max_table_rows = v
            .trim()
            .parse::<usize>()
            .with_context(|| "SARIF_ALERTS_UI_MAX_TABLE_ROWS")?;
    }
    if let Ok(v) = std::env::var("SARIF_ALERTS_EXTRACT_CODE_FLOWS") {
        cfg.extract.code_flows = v
            .parse::<CodeFlowPolicy>()
            .map_err(anyhow::Error::msg)
            .with_context(|| "SARIF_ALERTS_EXTRACT_CODE_FLOWS")?;
    }
    if let Ok(v) = std::env::var("SARIF_ALERTS_FILTER_EXCLUDE") {
        let parts: Vec<String> = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        if !parts.is_empty() {
            cfg.filter.exclude = parts;
        }
    }
    if let Ok(v) = std::env::var("SARIF_ALERTS_FILTER_MIN_SEVERITY") {
        cfg.filter.min_severity = Some(
            v.parse::<ResultSeverity>()
                .map_err(anyhow::Error::msg)
                .with_context(|| "SARIF_ALERTS_FILTER_MIN_SEVERITY")?,
        );
    }
    if let Ok(v) = std::env::var("SARIF_ALERTS_REPORT_INCLUDE_CODE_FLOWS") {
        cfg.report.include_code_flows =
            parse_bool(&v).with_context(|| "SARIF_ALERTS_REPORT_INCLUDE_CODE_FLOWS")?;
    }

    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool(" Yes ").expect("bool"));
        assert!(!parse_bool("off").expect("bool"));
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn embedded_schema_compiles() {
        DocumentValidator::new(&schema().expect("schema")).expect("compile schema");
    }

    #[test]
    fn valid_file_is_applied() {
        let raw = parse_validated(
            r#"
[extract]
code_flows = "discard"

[filter]
exclude = ["**/test/**"]
min_severity = "error"
"#,
        )
        .expect("valid config");
        let mut cfg = EffectiveConfig::default();
        apply_raw_config(&mut cfg, raw).expect("apply");
        assert_eq!(cfg.extract.code_flows, CodeFlowPolicy::Discard);
        assert_eq!(cfg.filter.exclude, vec!["**/test/**"]);
        assert_eq!(cfg.filter.min_severity, Some(ResultSeverity::Error));
    }

    #[test]
    fn schema_violations_are_all_reported() {
        let err = parse_validated(
            r#"
[ui]
max_table_rows = 0

[extract]
code_flows = "keep"
"#,
        )
        .expect_err("invalid config");
        let msg = format!("{err:#}");
        assert!(msg.contains("/ui/max_table_rows"), "{msg}");
        assert!(msg.contains("/extract/code_flows"), "{msg}");
    }
}
