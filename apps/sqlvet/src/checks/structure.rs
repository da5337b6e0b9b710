//! Structural problems that make statement boundaries ambiguous.

use crate::lexer::{self, Region};
use crate::models::{Finding, RuleCode, Script};
use crate::segment::Segmentation;

/// An odd number of `$$` delimiters leaves the rest of the file inside a
/// procedure body; everything after the opening delimiter is one statement.
pub fn check_body(script: &Script, seg: &Segmentation) -> Vec<Finding> {
    seg.unterminated_body
        .map(|line| {
            Finding::error(
                script.path(),
                RuleCode::UnterminatedBody,
                "Unterminated $$ procedure body",
                "The $$ opened here is never closed; the remaining statements were merged into one",
            )
            .at_line(line)
        })
        .into_iter()
        .collect()
}

/// A quote that never closes. Boundaries after it were recomputed ignoring
/// the quote and may not match what the warehouse would execute.
pub fn check_literal(script: &Script, seg: &Segmentation) -> Vec<Finding> {
    seg.unterminated_literal
        .map(|line| {
            Finding::error(
                script.path(),
                RuleCode::UnterminatedLiteral,
                "Unterminated quoted string or identifier",
                "The quote opened here is never closed; later statement boundaries are best effort",
            )
            .at_line(line)
        })
        .into_iter()
        .collect()
}

/// A `/*` without `*/` silently comments out the rest of the file.
pub fn check_comment(script: &Script, _seg: &Segmentation) -> Vec<Finding> {
    let content = script.content();
    lexer::scan(content)
        .unterminated
        .filter(|u| u.region == Region::BlockComment)
        .map(|u| {
            Finding::warning(
                script.path(),
                RuleCode::UnterminatedComment,
                "Unterminated /* block comment",
                "Everything after this point is ignored",
            )
            .at_line(lexer::line_of(content, u.offset))
        })
        .into_iter()
        .collect()
}
