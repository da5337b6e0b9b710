//! Static rules over SQL scripts.
//!
//! Every rule is a pure function of the script and its segmentation and
//! returns zero or more findings tagged with its own code. Rules share no
//! state, so the catalog order only fixes the order of the output.

pub mod catalog;
pub mod classify;
pub mod get_ddl;
pub mod identifier;
pub mod quotes;
pub mod recursive_cte;
pub mod split_to_table;
pub mod structure;

use crate::models::{Finding, RuleCode, Script};
use crate::segment::Segmentation;

pub type RuleFn = fn(&Script, &Segmentation) -> Vec<Finding>;

#[derive(Clone, Copy)]
pub struct Rule {
    pub code: RuleCode,
    pub run: RuleFn,
}

/// The fixed rule battery, in reporting order.
pub const CATALOG: [Rule; 11] = [
    Rule {
        code: RuleCode::RecursiveCteDistinct,
        run: recursive_cte::check,
    },
    Rule {
        code: RuleCode::CatalogColumn,
        run: catalog::check,
    },
    Rule {
        code: RuleCode::SplitToTableWrapper,
        run: split_to_table::check_wrapper,
    },
    Rule {
        code: RuleCode::SplitToTableValue,
        run: split_to_table::check_value,
    },
    Rule {
        code: RuleCode::IdentifierArgument,
        run: identifier::check,
    },
    Rule {
        code: RuleCode::GetDdlSignature,
        run: get_ddl::check,
    },
    Rule {
        code: RuleCode::UnbalancedQuote,
        run: quotes::check,
    },
    Rule {
        code: RuleCode::UnterminatedBody,
        run: structure::check_body,
    },
    Rule {
        code: RuleCode::UnterminatedLiteral,
        run: structure::check_literal,
    },
    Rule {
        code: RuleCode::UnterminatedComment,
        run: structure::check_comment,
    },
    Rule {
        code: RuleCode::UncheckedStatement,
        run: classify::check,
    },
];

/// Arguments of a call whose `(` sits at byte `open`.
///
/// Top-level commas split arguments; parentheses nest; single and double
/// quotes are honoured, and a backslash escapes the next byte both inside and
/// outside quotes (dynamic SQL embedded in string literals escapes its
/// quotes). `close` is `None` when the call never closes.
pub(crate) struct Call<'a> {
    pub args: Vec<&'a str>,
    pub close: Option<usize>,
}

pub(crate) fn call_arguments(text: &str, open: usize) -> Call<'_> {
    let bytes = text.as_bytes();
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut start = open + 1;
    let mut i = open + 1;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 2;
            continue;
        }
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'(' => depth += 1,
                b')' if depth == 0 => {
                    args.push(&text[start..i]);
                    return Call {
                        args,
                        close: Some(i),
                    };
                }
                b')' => depth -= 1,
                b',' if depth == 0 => {
                    args.push(&text[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
        i += 1;
    }
    args.push(&text[start.min(text.len())..]);
    Call { args, close: None }
}

/// Parenthesis depth at each byte of `text`; `None` inside quotes.
pub(crate) fn depth_map(text: &str) -> Vec<Option<usize>> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    for &b in bytes {
        if escaped {
            escaped = false;
            out.push(if quote.is_some() { None } else { Some(depth) });
            continue;
        }
        match quote {
            Some(q) => {
                out.push(None);
                if b == b'\\' {
                    escaped = true;
                } else if b == q {
                    quote = None;
                }
            }
            None => {
                match b {
                    b'\\' => escaped = true,
                    b'\'' | b'"' => quote = Some(b),
                    b'(' => depth += 1,
                    b')' => depth = depth.saturating_sub(1),
                    _ => {}
                }
                out.push(if quote.is_some() { None } else { Some(depth) });
            }
        }
    }
    out
}

/// First `limit` characters of `s` on a single line.
pub(crate) fn preview(s: &str, limit: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > limit {
        let mut cut: String = flat.chars().take(limit).collect();
        cut.push_str("...");
        cut
    } else {
        flat
    }
}
