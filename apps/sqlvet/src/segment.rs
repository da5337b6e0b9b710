//! Statement segmentation.
//!
//! Comments are stripped first, then the text is scanned with
//! [`crate::lexer::scan`]. A `;` ends a statement only inside a `Code`
//! region; semicolons in literals, quoted identifiers and `$$` bodies never
//! split. The terminator stays part of the statement it closes.
//!
//! Statement text is normalised line by line: every line trimmed, blank
//! lines dropped, lines re-joined with `\n`.
//!
//! A quote that is never closed would swallow the rest of the script. Its
//! line is recorded and boundaries are recomputed as if that quote were
//! plain text, so the statements after it still split.

use crate::lexer::{self, Region};
use crate::models::Statement;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub statements: Vec<Statement>,
    /// Line of a `$$` that is never closed. The tail after it is still
    /// returned as the last statement.
    pub unterminated_body: Option<usize>,
    /// Line of the first `'` or `"` that is never closed.
    pub unterminated_literal: Option<usize>,
}

/// Split script content into ordered statements.
pub fn split(content: &str) -> Segmentation {
    let text = lexer::strip_comments(content);
    // Same byte offsets as `text`, with stray quotes blanked out.
    let mut masked = text.clone();
    let mut unterminated_literal = None;
    let scan = loop {
        let scan = lexer::scan(&masked);
        match scan.unterminated {
            Some(u) if matches!(u.region, Region::Literal | Region::QuotedIdent) => {
                unterminated_literal.get_or_insert(lexer::line_of(&text, u.offset));
                masked.replace_range(u.offset..u.offset + 1, " ");
            }
            _ => break scan,
        }
    };

    let mut statements = Vec::new();
    let mut start = 0usize;
    for span in scan.spans.iter().filter(|s| s.region == Region::Code) {
        for (off, _) in masked[span.start..span.end].match_indices(';') {
            let end = span.start + off + 1;
            push_statement(&text, start, end, &mut statements);
            start = end;
        }
    }
    push_statement(&text, start, text.len(), &mut statements);

    let unterminated_body = scan
        .unterminated
        .filter(|u| u.region == Region::Body)
        .map(|u| lexer::line_of(&text, u.offset));
    Segmentation {
        statements,
        unterminated_body,
        unterminated_literal,
    }
}

/// Statements only, for callers that feed an executor.
pub fn statements(content: &str) -> Vec<Statement> {
    split(content).statements
}

fn push_statement(text: &str, start: usize, end: usize, out: &mut Vec<Statement>) {
    let raw = &text[start..end];
    let normalized = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    // A bare terminator is an empty statement.
    if normalized.trim_matches(|c: char| c == ';' || c.is_whitespace()).is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    out.push(Statement {
        index: out.len() + 1,
        line: lexer::line_of(text, start + lead),
        text: normalized,
    });
}
