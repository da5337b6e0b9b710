//! Typed rule identifiers.
//!
//! The kebab-case string of each code is stable: it appears in JSON output
//! and in `[rules].disable` of `sqlvet.toml`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCode {
    RecursiveCteDistinct,
    CatalogColumn,
    SplitToTableWrapper,
    SplitToTableValue,
    IdentifierArgument,
    GetDdlSignature,
    UnbalancedQuote,
    UnterminatedBody,
    UnterminatedLiteral,
    UnterminatedComment,
    UncheckedStatement,
    FileUnreadable,
    RulePanic,
}

impl RuleCode {
    pub const ALL: [RuleCode; 13] = [
        RuleCode::RecursiveCteDistinct,
        RuleCode::CatalogColumn,
        RuleCode::SplitToTableWrapper,
        RuleCode::SplitToTableValue,
        RuleCode::IdentifierArgument,
        RuleCode::GetDdlSignature,
        RuleCode::UnbalancedQuote,
        RuleCode::UnterminatedBody,
        RuleCode::UnterminatedLiteral,
        RuleCode::UnterminatedComment,
        RuleCode::UncheckedStatement,
        RuleCode::FileUnreadable,
        RuleCode::RulePanic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCode::RecursiveCteDistinct => "recursive-cte-distinct",
            RuleCode::CatalogColumn => "catalog-column",
            RuleCode::SplitToTableWrapper => "split-to-table-wrapper",
            RuleCode::SplitToTableValue => "split-to-table-value",
            RuleCode::IdentifierArgument => "identifier-argument",
            RuleCode::GetDdlSignature => "get-ddl-signature",
            RuleCode::UnbalancedQuote => "unbalanced-quote",
            RuleCode::UnterminatedBody => "unterminated-body",
            RuleCode::UnterminatedLiteral => "unterminated-literal",
            RuleCode::UnterminatedComment => "unterminated-comment",
            RuleCode::UncheckedStatement => "unchecked-statement",
            RuleCode::FileUnreadable => "file-unreadable",
            RuleCode::RulePanic => "rule-panic",
        }
    }

    /// One-line description shown by `sqlvet rules`.
    pub fn describe(&self) -> &'static str {
        match self {
            RuleCode::RecursiveCteDistinct => {
                "SELECT DISTINCT in a recursive term of a WITH RECURSIVE CTE"
            }
            RuleCode::CatalogColumn => "Wrong OBJECT_DEPENDENCIES column name",
            RuleCode::SplitToTableWrapper => "SPLIT_TO_TABLE not wrapped in TABLE(...)",
            RuleCode::SplitToTableValue => "SPLIT_TO_TABLE output columns never referenced",
            RuleCode::IdentifierArgument => {
                "IDENTIFIER() argument without variable, concatenation or literal"
            }
            RuleCode::GetDdlSignature => "GET_DDL('PROCEDURE', ...) without argument signature",
            RuleCode::UnbalancedQuote => "Line with an odd number of single quotes",
            RuleCode::UnterminatedBody => "$$ procedure body never closed",
            RuleCode::UnterminatedLiteral => "Quoted string or identifier never closed",
            RuleCode::UnterminatedComment => "/* block comment never closed",
            RuleCode::UncheckedStatement => "Statement kind not covered by static checks",
            RuleCode::FileUnreadable => "Script could not be read",
            RuleCode::RulePanic => "A rule aborted while inspecting the script",
        }
    }

    /// Codes a user may switch off. Load and isolation failures always report.
    pub fn is_configurable(&self) -> bool {
        !matches!(self, RuleCode::FileUnreadable | RuleCode::RulePanic)
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RuleCode::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| format!("unknown rule code '{}'", wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_parse_back() {
        for code in RuleCode::ALL {
            assert_eq!(code.as_str().parse::<RuleCode>(), Ok(code));
        }
        assert_eq!(" Catalog-Column ".parse::<RuleCode>(), Ok(RuleCode::CatalogColumn));
        assert!("no-such-rule".parse::<RuleCode>().is_err());
    }

    #[test]
    fn test_serialized_code_matches_as_str() {
        let v = serde_json::to_value(RuleCode::GetDdlSignature).unwrap();
        assert_eq!(v, "get-ddl-signature");
    }
}
