//! `GET_DDL('PROCEDURE', ...)` must name the procedure with its argument
//! signature, e.g. `'schema.proc(VARCHAR)'`, or overloads are ambiguous.

use super::call_arguments;
use crate::lexer::line_of;
use crate::models::{Finding, RuleCode, Script};
use crate::segment::Segmentation;
use regex::Regex;
use std::sync::LazyLock;

static GET_DDL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bGET_DDL\s*\(").expect("static regex"));

pub fn check(script: &Script, _seg: &Segmentation) -> Vec<Finding> {
    let text = script.stripped();
    let mut out = Vec::new();
    for m in GET_DDL.find_iter(text) {
        let call = call_arguments(text, m.end() - 1);
        let Some(kind) = call.args.first().map(|a| unquote(a)) else {
            continue;
        };
        if !kind.eq_ignore_ascii_case("PROCEDURE") {
            continue;
        }
        let signed = call.args.get(1).is_some_and(|target| has_signature(target));
        if !signed {
            out.push(
                Finding::warning(
                    script.path(),
                    RuleCode::GetDdlSignature,
                    "GET_DDL for PROCEDURE should include argument signature",
                    "Example: GET_DDL('PROCEDURE', 'schema.proc_name(VARCHAR)', TRUE)",
                )
                .at_line(line_of(text, m.start())),
            );
        }
    }
    out
}

fn unquote(arg: &str) -> &str {
    arg.trim_matches(|c: char| c.is_whitespace() || c == '\'' || c == '"' || c == '\\')
}

fn has_signature(target: &str) -> bool {
    match target.find('(') {
        Some(open) => target[open..].contains(')'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::split;

    fn run(sql: &str) -> Vec<Finding> {
        let script = Script::new("ddl.sql", sql);
        check(&script, &split(sql))
    }

    #[test]
    fn test_procedure_with_signature_is_fine() {
        let sql = "SELECT GET_DDL('PROCEDURE', 'db.s.load(VARCHAR, NUMBER)', TRUE);\nSELECT get_ddl('procedure', 'p()');";
        assert!(run(sql).is_empty());
    }

    #[test]
    fn test_procedure_without_signature_warns() {
        let f = run("SELECT 1;\nSELECT GET_DDL(\n  'PROCEDURE',\n  'db.s.load'\n);");
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].code, RuleCode::GetDdlSignature);
        assert_eq!(f[0].location, Some(crate::models::Location::Line(2)));
    }

    #[test]
    fn test_missing_target_warns() {
        assert_eq!(run("SELECT GET_DDL('PROCEDURE');").len(), 1);
    }

    #[test]
    fn test_other_kinds_ignored() {
        let sql = "SELECT GET_DDL('TABLE', 'db.s.t');\nSELECT GET_DDL('FUNCTION', 'db.s.f');";
        assert!(run(sql).is_empty());
    }

    #[test]
    fn test_escaped_quotes_in_dynamic_sql() {
        let sql = r"var q = 'SELECT GET_DDL(\'PROCEDURE\', \'' + name + '\')';";
        assert_eq!(run(sql).len(), 1);
        let ok = r"var q = 'SELECT GET_DDL(\'PROCEDURE\', \'s.p(INT)\')';";
        assert!(run(ok).is_empty());
    }
}
