//! Output rendering for validation reports and segmented statements.
//!
//! Supports `human` (default) and `json` outputs. Rendering is pure and
//! returns strings or JSON values; the `print_*` functions only write them
//! to stdout.

use crate::checks::classify::{classify, routine_name};
use crate::config::OutputFormat;
use crate::models::{Finding, Severity, Statement, ValidationReport};
use crate::utils::colors_enabled;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::fmt::Write as _;

/// Print a validation report in the requested format.
pub fn print_report(report: &ValidationReport, output: OutputFormat) {
    match output {
        OutputFormat::Json => println!("{:#}", compose_report_json(report)),
        OutputFormat::Human => print!("{}", render_human(report, colors_enabled())),
    }
}

/// Human-readable report: a status line per file, its findings, a summary.
pub fn render_human(report: &ValidationReport, color: bool) -> String {
    let mut out = String::new();
    for file in report.files() {
        let findings: Vec<&Finding> = report.findings_for(file).collect();
        let errors = count(&findings, Severity::Error);
        let warnings = count(&findings, Severity::Warning);
        let status = if errors > 0 {
            paint(color, &format!("✖ {} error(s)", errors), |s| {
                s.red().bold().to_string()
            })
        } else if warnings > 0 {
            paint(color, &format!("▲ {} warning(s)", warnings), |s| {
                s.yellow().bold().to_string()
            })
        } else {
            paint(color, "✔ ok", |s| s.green().bold().to_string())
        };
        let name = paint(color, file, |s| s.bold().to_string());
        let _ = writeln!(out, "{} {}", name, status);
        for f in findings {
            let _ = writeln!(out, "  {}", render_finding(f, color));
            if !f.detail.is_empty() {
                let _ = writeln!(out, "      {}", f.detail);
            }
        }
    }
    let s = report.summary();
    let summary = format!(
        "— Summary — errors={} warnings={} unchecked={} files={}",
        s.errors, s.warnings, s.unchecked, s.files
    );
    let _ = writeln!(out, "{}", paint(color, &summary, |s| s.bold().to_string()));
    let verdict = if report.passed() {
        if s.warnings > 0 {
            paint(color, "PASSED with warnings", |s| s.yellow().bold().to_string())
        } else {
            paint(color, "PASSED", |s| s.green().bold().to_string())
        }
    } else {
        paint(color, "FAILED", |s| s.red().bold().to_string())
    };
    let _ = writeln!(out, "{}", verdict);
    out
}

fn render_finding(f: &Finding, color: bool) -> String {
    let (icon, sev) = match f.severity {
        Severity::Error => (
            paint(color, "✖", |s| s.red().to_string()),
            paint(color, "⟦error⟧", |s| s.red().bold().to_string()),
        ),
        Severity::Warning => (
            paint(color, "▲", |s| s.yellow().to_string()),
            paint(color, "⟦warn⟧", |s| s.yellow().bold().to_string()),
        ),
        Severity::Unchecked => (
            paint(color, "◆", |s| s.blue().to_string()),
            paint(color, "⟦unchecked⟧", |s| s.bright_black().to_string()),
        ),
    };
    let loc = f
        .location
        .map(|l| format!(" ({})", l))
        .unwrap_or_default();
    format!("{} {} ❲{}❳{} {}", icon, sev, f.code, loc, f.message)
}

fn count(findings: &[&Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}

fn paint(color: bool, s: &str, style: impl Fn(&str) -> String) -> String {
    if color {
        style(s)
    } else {
        s.to_string()
    }
}

/// Compose report JSON object (pure) for testing/snapshot purposes.
///
/// Shape: `{ files: [{file, passed, findings: [...]}], summary, passed }`.
pub fn compose_report_json(report: &ValidationReport) -> JsonVal {
    let files: Vec<_> = report
        .files()
        .iter()
        .map(|file| {
            let findings: Vec<&Finding> = report.findings_for(file).collect();
            json!({
                "file": file,
                "passed": report.file_passed(file),
                "findings": findings,
            })
        })
        .collect();
    json!({
        "files": files,
        "summary": report.summary(),
        "passed": report.passed(),
    })
}

/// Print segmented statements of one script.
pub fn print_statements(file: &str, statements: &[Statement], output: OutputFormat) {
    match output {
        OutputFormat::Json => println!("{:#}", compose_statements_json(file, statements)),
        OutputFormat::Human => {
            let color = colors_enabled();
            for s in statements {
                let kind = classify(&s.text);
                let header = format!(
                    "-- [{}] statement {} (line {}, {:?})",
                    file, s.index, s.line, kind
                );
                println!("{}", paint(color, &header, |h| h.bright_black().to_string()));
                println!("{}", s.text);
            }
        }
    }
}

/// Compose statements JSON (pure): index, line, kind, routine name, text.
pub fn compose_statements_json(file: &str, statements: &[Statement]) -> JsonVal {
    let items: Vec<_> = statements
        .iter()
        .map(|s| {
            json!({
                "index": s.index,
                "line": s.line,
                "kind": classify(&s.text),
                "routine": routine_name(&s.text),
                "text": s.text,
            })
        })
        .collect();
    json!({"file": file, "statements": items, "total": statements.len()})
}
