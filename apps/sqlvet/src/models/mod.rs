//! Shared data models: scripts, statements, findings and the validation report.

pub mod rule;

pub use rule::RuleCode;

use serde::Serialize;
use std::fmt;

/// A loaded SQL script. Immutable once constructed.
///
/// The comment-stripped form is computed once on construction because
/// every rule reads it.
#[derive(Debug, Clone)]
pub struct Script {
    path: String,
    content: String,
    stripped: String,
}

impl Script {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let stripped = crate::lexer::strip_comments(&content);
        Self {
            path: path.into(),
            content,
            stripped,
        }
    }

    /// Identifier used in findings (usually a repo-relative path).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content with every comment removed; line numbering is preserved.
    pub fn stripped(&self) -> &str {
        &self.stripped
    }
}

/// One syntactically complete SQL unit cut out of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// 1-based position within the script.
    pub index: usize,
    /// 1-based line the statement starts on.
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    /// Statement kind the validator does not cover statically. Never fails a run.
    Unchecked,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Unchecked => "unchecked",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Location {
    Line(usize),
    Statement(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(n) => write!(f, "line {}", n),
            Location::Statement(n) => write!(f, "statement {}", n),
        }
    }
}

/// A single issue reported by one rule against one script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file: String,
    pub severity: Severity,
    pub code: RuleCode,
    pub message: String,
    pub detail: String,
    pub location: Option<Location>,
}

impl Finding {
    pub fn new(
        file: impl Into<String>,
        severity: Severity,
        code: RuleCode,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            severity,
            code,
            message: message.into(),
            detail: detail.into(),
            location: None,
        }
    }

    pub fn error(
        file: impl Into<String>,
        code: RuleCode,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(file, Severity::Error, code, message, detail)
    }

    pub fn warning(
        file: impl Into<String>,
        code: RuleCode,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(file, Severity::Warning, code, message, detail)
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.location = Some(Location::Line(line));
        self
    }

    pub fn at_statement(mut self, index: usize) -> Self {
        self.location = Some(Location::Statement(index));
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Aggregated counts used by printers and the exit code.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub unchecked: usize,
    pub files: usize,
}

#[derive(Debug, Clone, Serialize)]
/// Findings of one validation run plus derived counts and verdict.
///
/// Built once through [`ValidationReport::new`]; read-only afterwards.
pub struct ValidationReport {
    files: Vec<String>,
    findings: Vec<Finding>,
    summary: Summary,
    passed: bool,
}

impl ValidationReport {
    pub fn new(files: Vec<String>, findings: Vec<Finding>) -> Self {
        let mut summary = Summary {
            files: files.len(),
            ..Summary::default()
        };
        for f in &findings {
            match f.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Unchecked => summary.unchecked += 1,
            }
        }
        Self {
            files,
            findings,
            passed: summary.errors == 0,
            summary,
        }
    }

    /// Scanned script identifiers, in validation order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// True iff no error-severity finding exists.
    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn findings_for<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.file == file)
    }

    pub fn file_passed(&self, file: &str) -> bool {
        !self
            .findings_for(file)
            .any(|f| f.severity == Severity::Error)
    }
}
