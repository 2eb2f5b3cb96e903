use anyhow::Error;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

use crate::core::{AlertReport, AnalysisAlert, ResultSeverity};
use crate::exit::status_of;

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub max_table_rows: usize,
    pub quiet: bool,
    pub verbose: bool,
}

const DIAGNOSTICS_PREVIEW: usize = 3;

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "next:");
    let _ = writeln!(stderr, "  - {}", status_of(err).hint());
    let _ = writeln!(
        stderr,
        "  - see `sarif-alerts --help` for commands and options"
    );
}

pub fn print_alerts(report: &AlertReport, cfg: &UiConfig, top_n: usize) {
    if cfg.quiet {
        return;
    }

    let mut out = io::stdout().lock();
    let s = &report.summary;
    let _ = writeln!(
        out,
        "summary: alerts={}  error={}  warning={}  recommendation={}  diagnostics={}",
        s.total, s.errors, s.warnings, s.recommendations, s.diagnostics
    );
    if s.filtered > 0 {
        let _ = writeln!(out, "- {} alert(s) hidden by filters", s.filtered);
    }

    let total = report.alerts.len();
    let rows = cfg.max_table_rows.min(top_n).min(total);

    let _ = writeln!(out);
    if total > rows {
        let _ = writeln!(out, "alerts (showing {rows} of {total}):");
    } else {
        let _ = writeln!(out, "alerts ({rows}):");
    }
    print_alerts_table(&mut out, &report.alerts, rows, cfg.color);
    drop(out);

    print_diagnostics(&report.errors, cfg);
}

pub fn print_diagnostics(errors: &[String], cfg: &UiConfig) {
    if cfg.quiet || errors.is_empty() {
        return;
    }

    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "diagnostics ({}):", errors.len());
    let shown = if cfg.verbose {
        errors.len()
    } else {
        errors.len().min(DIAGNOSTICS_PREVIEW)
    };
    for e in errors.iter().take(shown) {
        let _ = writeln!(stderr, "  - {e}");
    }
    if shown < errors.len() {
        let _ = writeln!(
            stderr,
            "  ... {} more (use --verbose to list all)",
            errors.len() - shown
        );
    }
}

fn truncate_middle(s: &str, max_chars: usize) -> String {
    let len = s.chars().count();
    if len <= max_chars {
        return s.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let left = keep / 2;
    let right = keep.saturating_sub(left);

    let prefix: String = s.chars().take(left).collect();
    let suffix: String = s
        .chars()
        .rev()
        .take(right)
        .collect::<String>()
        .chars()
        .rev()
        .collect();

    format!("{prefix}...{suffix}")
}

pub fn format_position(alert: &AnalysisAlert) -> String {
    let r = &alert.highlighted_region;
    format!("{}:{}:{}", alert.file_path, r.start_line, r.start_column)
}

fn print_alerts_table(out: &mut dyn Write, alerts: &[AnalysisAlert], rows: usize, color: bool) {
    let label_severity = "SEVERITY";
    let label_location = "LOCATION";
    let label_title = "DESCRIPTION";

    let locations: Vec<String> = alerts
        .iter()
        .take(rows)
        .map(|a| truncate_middle(&format_position(a), 60))
        .collect();

    let sev_w = visible_width_ansi(label_severity).max("Recommendation".len());
    let loc_w = locations
        .iter()
        .map(|l| visible_width_ansi(l))
        .max()
        .unwrap_or(0)
        .max(visible_width_ansi(label_location));
    let title_w = visible_width_ansi(label_title);

    let _ = writeln!(
        out,
        "{}  {}  {}",
        pad_end(label_severity, sev_w),
        pad_end(label_location, loc_w),
        label_title
    );
    let _ = writeln!(
        out,
        "{}  {}  {}",
        "-".repeat(sev_w),
        "-".repeat(loc_w),
        "-".repeat(title_w)
    );

    for (alert, location) in alerts.iter().zip(locations.iter()) {
        let severity = pad_end(&format_severity(alert.severity, color), sev_w);
        let location = pad_end(location, loc_w);
        let _ = writeln!(out, "{severity}  {location}  {}", alert.short_description);
    }
}

fn format_severity(severity: ResultSeverity, color: bool) -> String {
    let s = severity.as_str();
    if !color {
        return s.to_string();
    }

    let code = match severity {
        ResultSeverity::Recommendation => "36",
        ResultSeverity::Warning => "33",
        ResultSeverity::Error => "31",
    };
    format!("\x1b[{code}m{s}\x1b[0m")
}

fn pad_end(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - w))
}

fn visible_width_ansi(s: &str) -> usize {
    let mut width: usize = 0;
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            let _ = chars.next();
            for ch2 in chars.by_ref() {
                if ch2 == 'm' {
                    break;
                }
            }
            continue;
        }
        width = width.saturating_add(UnicodeWidthChar::width(ch).unwrap_or(0));
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_middle_keeps_both_ends() {
        assert_eq!(truncate_middle("short", 10), "short");
        assert_eq!(truncate_middle("abcdefghijkl", 9), "abc...jkl");
    }

    #[test]
    fn ansi_sequences_have_no_width() {
        let colored = format_severity(ResultSeverity::Error, true);
        assert_eq!(visible_width_ansi(&colored), "Error".len());
        assert_eq!(pad_end(&colored, 8).len(), colored.len() + 3);
    }

    #[test]
    fn pad_end_counts_display_columns() {
        assert_eq!(pad_end("ab", 4), "ab  ");
        assert_eq!(pad_end("日本", 6), "日本  ");
        assert_eq!(pad_end("toolong", 3), "toolong");
    }
}
