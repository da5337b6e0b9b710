//! Line-level heuristic for unbalanced single quotes.
//!
//! Best effort only: string literals spanning several lines are reported on
//! their opening and closing lines. Doubled quotes (`''`) count twice and so
//! never unbalance a line; backslash-escaped quotes are not counted.

use super::preview;
use crate::models::{Finding, RuleCode, Script};
use crate::segment::Segmentation;

pub fn check(script: &Script, _seg: &Segmentation) -> Vec<Finding> {
    script
        .stripped()
        .lines()
        .enumerate()
        .filter_map(|(n, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || !is_unbalanced(line) || trimmed.ends_with('\\') {
                return None;
            }
            Some(
                Finding::warning(
                    script.path(),
                    RuleCode::UnbalancedQuote,
                    format!("Line {}: Possible unmatched single quotes", n + 1),
                    preview(trimmed, 100),
                )
                .at_line(n + 1),
            )
        })
        .collect()
}

fn is_unbalanced(line: &str) -> bool {
    let bytes = line.as_bytes();
    let count = bytes
        .iter()
        .enumerate()
        .filter(|(i, b)| **b == b'\'' && (*i == 0 || bytes[i - 1] != b'\\'))
        .count();
    count % 2 == 1
}
