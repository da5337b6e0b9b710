//! Statement classification and coverage tracking.
//!
//! Statements the validator has nothing to say about statically are not
//! silently treated as passing: each one yields an `Unchecked` finding so
//! coverage gaps stay visible in reports.

use super::preview;
use crate::models::{Finding, RuleCode, Script, Severity, Statement};
use crate::segment::Segmentation;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    /// Session, grant, share and drop statements that cannot be explained.
    Skipped,
    /// `CREATE [OR REPLACE] PROCEDURE|FUNCTION`.
    Routine,
    /// `SELECT` or `WITH` query.
    Query,
    Other,
}

static SKIPPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^\s*(?:USE\s|SHOW\s|DESC\s|DESCRIBE\s|CALL\s|GRANT\s|CREATE\s+SHARE\b|ALTER\s+SHARE\b|DROP\s|CREATE\s+(?:OR\s+REPLACE\s+)?DATABASE\b.*\bFROM\s+SHARE\b)",
    )
    .expect("static regex")
});
static ROUTINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?(?:SECURE\s+)?(?:PROCEDURE|FUNCTION)\s+([^\s(]+)")
        .expect("static regex")
});
static QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:WITH|SELECT)\b").expect("static regex"));

pub fn classify(stmt: &str) -> StatementKind {
    if SKIPPED.is_match(stmt) {
        StatementKind::Skipped
    } else if ROUTINE.is_match(stmt) {
        StatementKind::Routine
    } else if QUERY.is_match(stmt) {
        StatementKind::Query
    } else {
        StatementKind::Other
    }
}

/// Name of the routine a `CREATE PROCEDURE|FUNCTION` statement defines.
pub fn routine_name(stmt: &str) -> Option<&str> {
    ROUTINE
        .captures(stmt)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn check(script: &Script, seg: &Segmentation) -> Vec<Finding> {
    seg.statements
        .iter()
        .filter(|s| classify(&s.text) == StatementKind::Other)
        .map(|s| unchecked(script, s))
        .collect()
}

fn unchecked(script: &Script, stmt: &Statement) -> Finding {
    Finding::new(
        script.path(),
        Severity::Unchecked,
        RuleCode::UncheckedStatement,
        format!("Statement {}: not covered by static checks", stmt.index),
        preview(&stmt.text, 100),
    )
    .at_statement(stmt.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::split;

    #[test]
    fn test_classify_kinds() {
        assert_eq!(classify("USE ROLE accountadmin;"), StatementKind::Skipped);
        assert_eq!(classify("drop table if exists t;"), StatementKind::Skipped);
        assert_eq!(classify("CREATE SHARE s;"), StatementKind::Skipped);
        assert_eq!(
            classify("CREATE DATABASE d\n  FROM SHARE acct.s;"),
            StatementKind::Skipped
        );
        assert_eq!(
            classify("CREATE OR REPLACE PROCEDURE db.s.p(x VARCHAR) RETURNS STRING AS $$ $$;"),
            StatementKind::Routine
        );
        assert_eq!(classify("with x as (select 1) select * from x;"), StatementKind::Query);
        assert_eq!(classify("INSERT INTO t SELECT 1;"), StatementKind::Other);
        assert_eq!(classify("CREATE DATABASE d;"), StatementKind::Other);
        assert_eq!(classify("USER_TABLE;"), StatementKind::Other);
    }

    #[test]
    fn test_routine_name() {
        assert_eq!(
            routine_name("CREATE OR REPLACE PROCEDURE db.s.migrate(src VARCHAR)"),
            Some("db.s.migrate")
        );
        assert_eq!(routine_name("create function f ()"), Some("f"));
        assert_eq!(routine_name("SELECT 1"), None);
    }

    #[test]
    fn test_only_other_statements_are_unchecked() {
        let sql = "USE DATABASE d;\nSELECT 1;\nINSERT INTO t VALUES (1);\nUPDATE t SET a = 2;";
        let script = Script::new("u.sql", sql);
        let f = check(&script, &split(sql));
        assert_eq!(f.len(), 2);
        assert!(f.iter().all(|x| x.severity == Severity::Unchecked));
        assert_eq!(f[0].location, Some(crate::models::Location::Statement(3)));
        assert_eq!(f[1].detail, "UPDATE t SET a = 2;");
    }
}
