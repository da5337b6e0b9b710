//! `DISTINCT` inside the recursive term of a recursive CTE.
//!
//! Every CTE of a `WITH RECURSIVE` list is inspected. Its body (balanced
//! parentheses after `AS`) is split on `UNION ALL` at body depth 0. The first
//! part is the anchor; each later part containing `SELECT DISTINCT` yields
//! one error. `DISTINCT` in the anchor or in the outer query is legal.

use super::{call_arguments, depth_map};
use crate::lexer::line_of;
use crate::models::{Finding, RuleCode, Script};
use crate::segment::Segmentation;
use regex::Regex;
use std::sync::LazyLock;

static WITH_RECURSIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bWITH\s+RECURSIVE\s+").expect("static regex"));
static CTE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^\s*("[^"]+"|\w+)\s*(?:\([^()]*\)\s*)?AS\s*\("#).expect("static regex")
});
static UNION_ALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bUNION\s+ALL\b").expect("static regex"));
static SELECT_DISTINCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSELECT\s+DISTINCT\b").expect("static regex"));

pub fn check(script: &Script, _seg: &Segmentation) -> Vec<Finding> {
    let text = script.stripped();
    let mut out = Vec::new();
    for m in WITH_RECURSIVE.find_iter(text) {
        let mut pos = m.end();
        while let Some(head) = CTE_HEAD.captures(&text[pos..]) {
            let name = head[1].trim_matches('"').to_string();
            let open = pos + head[0].len() - 1;
            let Some(close) = call_arguments(text, open).close else {
                break;
            };
            check_body(script, text, &name, open + 1, close, &mut out);

            let rest = &text[close + 1..];
            let after = rest.trim_start();
            match after.strip_prefix(',') {
                Some(_) => pos = close + 1 + (rest.len() - after.len()) + 1,
                None => break,
            }
        }
    }
    out
}

fn check_body(
    script: &Script,
    text: &str,
    name: &str,
    start: usize,
    end: usize,
    out: &mut Vec<Finding>,
) {
    let body = &text[start..end];
    let depths = depth_map(body);
    let splits: Vec<(usize, usize)> = UNION_ALL
        .find_iter(body)
        .filter(|u| depths.get(u.start()).copied().flatten() == Some(0))
        .map(|u| (u.start(), u.end()))
        .collect();
    if splits.is_empty() {
        return;
    }
    for (n, window) in splits.iter().enumerate() {
        let part_start = window.1;
        let part_end = splits.get(n + 1).map(|s| s.0).unwrap_or(body.len());
        let part = &body[part_start..part_end];
        if let Some(d) = SELECT_DISTINCT.find(part) {
            let line = line_of(text, start + part_start + d.start());
            out.push(
                Finding::error(
                    script.path(),
                    RuleCode::RecursiveCteDistinct,
                    format!(
                        "DISTINCT in recursive CTE term '{}' (part {})",
                        name,
                        n + 2
                    ),
                    "DISTINCT is not allowed in recursive terms, only in the anchor clause or the final SELECT",
                )
                .at_line(line),
            );
        }
    }
}
