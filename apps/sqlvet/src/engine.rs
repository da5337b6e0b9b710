//! Rule engine: runs the check catalog over scripts and builds the report.
//!
//! Each script is segmented once and every enabled rule runs against it in
//! catalog order. Rule invocations are isolated from each other: a rule that
//! panics yields a single `rule-panic` error and the remaining rules still
//! run. Scripts are validated in parallel; the report keeps input order.

use crate::checks::{Rule, CATALOG};
use crate::loader::identify;
use crate::models::{Finding, RuleCode, Script, ValidationReport};
use crate::segment;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

pub struct Engine {
    rules: Vec<Rule>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine running the full catalog.
    pub fn new() -> Self {
        Self {
            rules: CATALOG.to_vec(),
        }
    }

    /// Engine with the given rule codes switched off.
    pub fn with_disabled(disabled: &[RuleCode]) -> Self {
        Self {
            rules: CATALOG
                .iter()
                .filter(|r| !disabled.contains(&r.code))
                .copied()
                .collect(),
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = RuleCode> + '_ {
        self.rules.iter().map(|r| r.code)
    }

    /// Validate one loaded script.
    pub fn validate(&self, script: &Script) -> Vec<Finding> {
        self.run_rules(&self.rules, script)
    }

    fn run_rules(&self, rules: &[Rule], script: &Script) -> Vec<Finding> {
        let seg = segment::split(script.content());
        let mut findings = Vec::new();
        for rule in rules {
            match panic::catch_unwind(AssertUnwindSafe(|| (rule.run)(script, &seg))) {
                Ok(mut found) => findings.append(&mut found),
                Err(_) => {
                    tracing::error!(file = script.path(), rule = %rule.code, "rule aborted");
                    findings.push(Finding::error(
                        script.path(),
                        RuleCode::RulePanic,
                        format!("Rule '{}' aborted while inspecting this script", rule.code),
                        "Other rules still ran; please report this script",
                    ));
                }
            }
        }
        tracing::debug!(
            file = script.path(),
            statements = seg.statements.len(),
            findings = findings.len(),
            "validated"
        );
        findings
    }

    /// Load and validate one file. An unreadable file yields exactly one
    /// `file-unreadable` error and no further rules run for it.
    pub fn validate_path(&self, path: &Path, id: &str) -> Vec<Finding> {
        match Script::load(path, id) {
            Ok(script) => self.validate(&script),
            Err(e) => {
                tracing::warn!(file = id, error = %e, "script unreadable");
                vec![Finding::error(
                    id,
                    RuleCode::FileUnreadable,
                    "File read error",
                    e.to_string(),
                )]
            }
        }
    }

    /// Validate many files in parallel. Findings are grouped per file in the
    /// order of `paths`; identifiers are made relative to `root`.
    pub fn validate_all(&self, root: &Path, paths: &[PathBuf]) -> ValidationReport {
        let per_file: Vec<(String, Vec<Finding>)> = paths
            .par_iter()
            .map(|path| {
                let id = identify(root, path);
                let findings = self.validate_path(path, &id);
                (id, findings)
            })
            .collect();
        let mut files = Vec::with_capacity(per_file.len());
        let mut findings = Vec::new();
        for (id, mut found) in per_file {
            files.push(id);
            findings.append(&mut found);
        }
        ValidationReport::new(files, findings)
    }
}
