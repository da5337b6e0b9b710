//! `IDENTIFIER(...)` built from a bare name.

use super::call_arguments;
use crate::lexer::line_of;
use crate::models::{Finding, RuleCode, Script};
use crate::segment::Segmentation;
use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bIDENTIFIER\s*\(").expect("static regex"));

/// Bind-variable markers, concatenation and quoting that make an argument dynamic.
const MARKERS: [&str; 5] = [":", "$", "?", "||", "'"];

pub fn check(script: &Script, _seg: &Segmentation) -> Vec<Finding> {
    let text = script.stripped();
    IDENTIFIER_CALL
        .find_iter(text)
        .filter_map(|m| {
            let open = m.end() - 1;
            // An unclosed call is left to the quote and structure rules.
            let close = call_arguments(text, open).close?;
            let arg = text[open + 1..close].trim();
            if is_dynamic(arg) {
                return None;
            }
            Some(
                Finding::warning(
                    script.path(),
                    RuleCode::IdentifierArgument,
                    format!("IDENTIFIER usage may be incorrect: IDENTIFIER({})", arg),
                    "IDENTIFIER should use variables (:var) or string concatenation",
                )
                .at_line(line_of(text, m.start())),
            )
        })
        .collect()
}

fn is_dynamic(arg: &str) -> bool {
    MARKERS.iter().any(|m| arg.contains(m)) || arg.to_ascii_uppercase().contains("CONCAT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::split;

    fn run(sql: &str) -> Vec<Finding> {
        let script = Script::new("ident.sql", sql);
        check(&script, &split(sql))
    }

    #[test]
    fn test_dynamic_arguments_are_fine() {
        let sql = "SELECT * FROM IDENTIFIER(:tbl);\nSELECT * FROM identifier($tbl);\nSELECT * FROM IDENTIFIER('db.' || :s || '.t');\nSELECT * FROM IDENTIFIER(concat(:a, '.t'));\nSELECT * FROM IDENTIFIER('db.s.t');";
        assert!(run(sql).is_empty());
    }

    #[test]
    fn test_bare_name_warns() {
        let f = run("SELECT 1;\nSELECT * FROM IDENTIFIER( my_table );");
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].message, "IDENTIFIER usage may be incorrect: IDENTIFIER(my_table)");
        assert_eq!(f[0].location, Some(crate::models::Location::Line(2)));
    }

    #[test]
    fn test_nested_argument_reported_whole() {
        let f = run("SELECT * FROM IDENTIFIER(UPPER(tbl)) WHERE x IN (1, 2);");
        assert_eq!(f.len(), 1);
        assert_eq!(
            f[0].message,
            "IDENTIFIER usage may be incorrect: IDENTIFIER(UPPER(tbl))"
        );
    }

    #[test]
    fn test_nested_argument_with_marker_is_fine() {
        assert!(run("SELECT * FROM IDENTIFIER(UPPER(:tbl));").is_empty());
    }

    #[test]
    fn test_each_occurrence_reported() {
        let f = run("SELECT * FROM IDENTIFIER(a) JOIN IDENTIFIER(b) USING (id);");
        assert_eq!(f.len(), 2);
    }
}
