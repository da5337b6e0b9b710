//! `SPLIT_TO_TABLE` usage, checked per statement.
//!
//! Two independent checks share the trigger: the call must sit directly
//! inside `TABLE(...)`, and the statement must reference at least one of the
//! function's output columns (`SEQ`, `INDEX`, `VALUE`).
//!
//! A qualified reference counts only when its qualifier is the alias given
//! to the call (`TABLE(SPLIT_TO_TABLE(...)) s` then `s.value`); `o.index` on
//! another table does not. Unqualified `SELECT VALUE` and `TRIM(VALUE` always
//! count.

use super::call_arguments;
use crate::models::{Finding, RuleCode, Script, Statement};
use crate::segment::Segmentation;
use regex::Regex;
use std::sync::LazyLock;

static CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSPLIT_TO_TABLE\s*\(").expect("static regex"));
static TABLE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTABLE\s*\(\s*$").expect("static regex"));
static BARE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSELECT\s+(?:DISTINCT\s+)?(?:VALUE|SEQ|INDEX)\b|\bTRIM\s*\(\s*VALUE\b")
        .expect("static regex")
});
static QUALIFIED_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-Za-z_][A-Za-z0-9_$]*)\s*\.\s*(?:VALUE|SEQ|INDEX)\b")
        .expect("static regex")
});
/// Alias after the call, past an optional closing `)` of `TABLE(`.
static ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\)?\s*(?:AS\s+)?([A-Za-z_][A-Za-z0-9_$]*)").expect("static regex")
});

/// Warn for each call not wrapped in `TABLE(`.
pub fn check_wrapper(script: &Script, seg: &Segmentation) -> Vec<Finding> {
    let mut out = Vec::new();
    for stmt in &seg.statements {
        let unwrapped = CALL
            .find_iter(&stmt.text)
            .filter(|m| !TABLE_OPEN.is_match(&stmt.text[..m.start()]))
            .count();
        for _ in 0..unwrapped {
            out.push(
                Finding::warning(
                    script.path(),
                    RuleCode::SplitToTableWrapper,
                    "SPLIT_TO_TABLE should be used with TABLE() function",
                    "Correct: SELECT VALUE FROM TABLE(SPLIT_TO_TABLE(...))",
                )
                .at_statement(stmt.index),
            );
        }
    }
    out
}

/// Warn once per statement that calls the function but reads none of its columns.
pub fn check_value(script: &Script, seg: &Segmentation) -> Vec<Finding> {
    seg.statements
        .iter()
        .filter(|s| uses_split(s) && !reads_output(&s.text))
        .map(|s| {
            Finding::warning(
                script.path(),
                RuleCode::SplitToTableValue,
                "SPLIT_TO_TABLE results should reference VALUE column",
                "SPLIT_TO_TABLE returns SEQ, INDEX, VALUE columns",
            )
            .at_statement(s.index)
        })
        .collect()
}

fn uses_split(stmt: &Statement) -> bool {
    CALL.is_match(&stmt.text)
}

fn reads_output(text: &str) -> bool {
    if BARE_REF.is_match(text) {
        return true;
    }
    let aliases = call_aliases(text);
    QUALIFIED_REF
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .any(|q| aliases.iter().any(|a| a.eq_ignore_ascii_case(q.as_str())))
}

fn call_aliases(text: &str) -> Vec<&str> {
    CALL.find_iter(text)
        .filter_map(|m| call_arguments(text, m.end() - 1).close)
        .filter_map(|close| ALIAS.captures(&text[close + 1..]))
        .filter_map(|caps| caps.get(1))
        .map(|alias| alias.as_str())
        .collect()
}
