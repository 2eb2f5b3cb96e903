use std::io;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::config::EffectiveConfig;
use crate::core::{AlertReport, AlertSummary, ResultSeverity};
use crate::exit::{Status, WithStatus, fail};
use crate::filter::AlertFilter;
use crate::sarif::{CodeFlowPolicy, ExtractOptions};
use crate::ui::UiConfig;
use crate::validator::DocumentValidator;

#[derive(Debug, Parser)]
#[command(
    name = "sarif-alerts",
    version,
    about = "Turn SARIF static-analysis logs into normalized alerts, reporting every malformed part"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Alerts(AlertsArgs),
    Report(ReportArgs),
    Validate(ValidateArgs),
    Completion(CompletionArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    pub log: PathBuf,
    #[arg(long)]
    pub code_flows: Option<CodeFlowPolicy>,
    #[arg(long)]
    pub exclude: Vec<String>,
    #[arg(long)]
    pub min_severity: Option<ResultSeverity>,
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(flatten)]
    pub extract: ExtractArgs,
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub extract: ExtractArgs,
    #[arg(long)]
    pub markdown: bool,
    #[arg(long)]
    pub include_code_flows: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    pub document: PathBuf,
    #[arg(long)]
    pub schema: PathBuf,
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let stdout_is_tty = io::stdout().is_terminal();

    let home_dir = std::env::var_os("HOME").map(PathBuf::from);
    let env_config_path = std::env::var_os("SARIF_ALERTS_CONFIG").map(PathBuf::from);
    let cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        home_dir.as_deref(),
    )
    .with_status(Status::Usage)?;

    let ui_cfg = UiConfig {
        color: stdout_is_tty && cfg.ui.color && !cli.no_color,
        max_table_rows: cfg.ui.max_table_rows,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Alerts(args) => {
            let report = build_report(&args.extract, &cfg)?;
            if cli.json {
                write_json(&report)?;
            } else {
                let top_n = args.top.unwrap_or(cfg.ui.max_table_rows);
                crate::ui::print_alerts(&report, &ui_cfg, top_n);
            }
            check_strict(&args.extract, &report)?;
        }
        Commands::Report(args) => {
            let include_code_flows = args.include_code_flows || cfg.report.include_code_flows;
            let mut report = build_report(&args.extract, &cfg)?;
            if !include_code_flows {
                strip_code_flows(&mut report);
            }
            if cli.json {
                write_json(&report)?;
            } else if args.markdown {
                write_stdout(&format_markdown_report(&report, include_code_flows))?;
                crate::ui::print_diagnostics(&report.errors, &ui_cfg);
            } else {
                crate::ui::print_alerts(&report, &ui_cfg, cfg.ui.max_table_rows);
            }
            check_strict(&args.extract, &report)?;
        }
        Commands::Validate(args) => {
            let schema = read_document(&args.schema).with_status(Status::Usage)?;
            let document = read_document(&args.document).with_status(Status::Unreadable)?;
            let validator = DocumentValidator::new(&schema).with_status(Status::Usage)?;
            let errors = validator.validate(&document);
            if cli.json {
                write_json(&errors)?;
            } else if !ui_cfg.quiet {
                if errors.is_empty() {
                    println!("{}: valid", args.document.display());
                } else {
                    for e in &errors {
                        println!("{e}");
                    }
                }
            }
            if !errors.is_empty() {
                return Err(fail(
                    Status::Diagnostics,
                    format!(
                        "{}: {} schema violation(s)",
                        args.document.display(),
                        errors.len()
                    ),
                ));
            }
        }
        Commands::Completion(args) => {
            let shell = parse_shell(&args.shell)?;
            let mut cmd = Cli::command();
            let mut out = std::io::stdout().lock();
            clap_complete::generate(shell, &mut cmd, "sarif-alerts", &mut out);
        }
        Commands::Config(args) => {
            if args.show {
                if cli.json {
                    write_json(&cfg)?;
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: use `sarif-alerts config --show`");
            }
        }
    }

    Ok(())
}

fn build_report(args: &ExtractArgs, cfg: &EffectiveConfig) -> Result<AlertReport> {
    let mut exclude = cfg.filter.exclude.clone();
    exclude.extend(args.exclude.iter().cloned());
    exclude.sort();
    exclude.dedup();
    let filter = AlertFilter::new(&exclude, args.min_severity.or(cfg.filter.min_severity))
        .with_status(Status::Usage)?;

    let log = crate::sarif::load_log(&args.log).with_status(Status::Unreadable)?;
    let opts = ExtractOptions {
        code_flows: args.code_flows.unwrap_or(cfg.extract.code_flows),
    };
    let extraction = crate::sarif::extract_analysis_alerts_with(Some(&log), &opts);

    let (alerts, filtered) = filter.apply(extraction.alerts);
    let summary = AlertSummary::from_alerts(&alerts, extraction.errors.len(), filtered);

    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    Ok(AlertReport {
        schema_version: "1.0".to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at,
        source: args.log.display().to_string(),
        summary,
        alerts,
        errors: extraction.errors,
    })
}

fn check_strict(args: &ExtractArgs, report: &AlertReport) -> Result<()> {
    if args.strict && !report.errors.is_empty() {
        return Err(fail(
            Status::Diagnostics,
            format!(
                "{} extraction diagnostic(s) reported (--strict)",
                report.errors.len()
            ),
        ));
    }
    Ok(())
}

fn strip_code_flows(report: &mut AlertReport) {
    for alert in &mut report.alerts {
        alert.code_flows.clear();
    }
}

fn read_document(path: &Path) -> Result<serde_json::Value> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document: {}", path.display()))?;
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
    if is_toml {
        let doc: toml::Value = toml::from_str(&s)
            .with_context(|| format!("failed to parse TOML document: {}", path.display()))?;
        serde_json::to_value(doc).context("failed to convert TOML document")
    } else {
        serde_json::from_str(&s)
            .with_context(|| format!("failed to parse JSON document: {}", path.display()))
    }
}

fn write_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut buf = serde_json::to_vec_pretty(value)?;
    buf.push(b'\n');
    write_stdout_bytes(&buf)
}

fn write_stdout(s: &str) -> Result<()> {
    write_stdout_bytes(s.as_bytes())
}

fn write_stdout_bytes(buf: &[u8]) -> Result<()> {
    use std::io::Write;

    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(buf) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn format_markdown_report(report: &AlertReport, include_code_flows: bool) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();

    let _ = writeln!(out, "# sarif-alerts report");
    let _ = writeln!(out);
    let _ = writeln!(out, "- tool version: {}", report.tool_version);
    let _ = writeln!(out, "- generated at: {}", report.generated_at);
    let _ = writeln!(out, "- source: `{}`", report.source);
    let s = &report.summary;
    let _ = writeln!(
        out,
        "- alerts: {} (error {}, warning {}, recommendation {})",
        s.total, s.errors, s.warnings, s.recommendations
    );
    if s.filtered > 0 {
        let _ = writeln!(out, "- hidden by filters: {}", s.filtered);
    }
    let _ = writeln!(out, "- diagnostics: {}", s.diagnostics);

    let _ = writeln!(out);
    let _ = writeln!(out, "## Alerts ({})", report.alerts.len());
    if report.alerts.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "_No alerts._");
    }

    for (idx, alert) in report.alerts.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "### {}. {} ({})",
            idx + 1,
            alert.short_description,
            alert.severity
        );
        let _ = writeln!(out, "- location: `{}`", crate::ui::format_position(alert));
        let _ = writeln!(out, "- message: {}", alert.message);
        let _ = writeln!(
            out,
            "- snippet: lines {}-{}",
            alert.code_snippet.start_line, alert.code_snippet.end_line
        );
        write_fenced_code_block(&mut out, "", "", &alert.code_snippet.text);

        if include_code_flows {
            for (flow_idx, flow) in alert.code_flows.iter().enumerate() {
                let _ = writeln!(out, "- code flow {}:", flow_idx + 1);
                for (step_idx, step) in flow.thread_flows.iter().enumerate() {
                    let r = &step.highlighted_region;
                    let _ = write!(
                        out,
                        "  {}. `{}:{}:{}`",
                        step_idx + 1,
                        step.file_path,
                        r.start_line,
                        r.start_column
                    );
                    match step.message.as_deref() {
                        Some(m) => {
                            let _ = writeln!(out, " {m}");
                        }
                        None => {
                            let _ = writeln!(out);
                        }
                    }
                }
            }
        }
    }

    if !report.errors.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Diagnostics ({})", report.errors.len());
        let _ = writeln!(out);
        for e in &report.errors {
            let _ = writeln!(out, "- {e}");
        }
    }

    out
}

fn write_fenced_code_block(out: &mut String, indent: &str, lang: &str, content: &str) {
    use std::fmt::Write as _;

    let fence = if content.contains("```") { "````" } else { "```" };
    let _ = writeln!(out, "{indent}{fence}{lang}");
    for line in content.lines() {
        let _ = writeln!(out, "{indent}{line}");
    }
    let _ = writeln!(out, "{indent}{fence}");
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(fail(
            Status::Usage,
            format!("unsupported shell: {other} (expected bash|zsh|fish)"),
        )),
    }
}
