//! Delimiter tracking for SQL text.
//!
//! `scan` runs an explicit state machine over the bytes of a script and
//! partitions it into contiguous [`Span`]s, one per lexical region:
//!
//! - `Code`: plain SQL outside every other region.
//! - `Literal`: `'...'`. A doubled `''` closes and immediately reopens, so it
//!   yields two adjacent literal spans. A backslash escapes the next byte.
//! - `QuotedIdent`: `"..."`.
//! - `LineComment`: `--` up to, not including, the newline.
//! - `BlockComment`: `/* ... */`, non-nesting.
//! - `Body`: `$$ ... $$`, delimiters included. Inside a body single quotes
//!   are only tracked to decide whether `--` or `/*` open a comment; `$$`
//!   always closes the body.
//!
//! All delimiters are ASCII, so span boundaries are always valid `char`
//! boundaries of the input.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Code,
    Literal,
    QuotedIdent,
    Body,
    LineComment,
    BlockComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub region: Region,
    pub start: usize,
    pub end: usize,
}

/// A region still open when the input ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unterminated {
    pub region: Region,
    /// Byte offset of the opening delimiter.
    pub offset: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub spans: Vec<Span>,
    pub unterminated: Option<Unterminated>,
}

impl Scan {
    fn close(&mut self, region: Region, start: usize, end: usize) {
        if end > start {
            self.spans.push(Span { region, start, end });
        }
    }
}

/// Partition `text` into lexical regions.
pub fn scan(text: &str) -> Scan {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut out = Scan::default();
    let mut state = Region::Code;
    let mut start = 0usize;
    // Offset of the `$$` that opened the current body, if any.
    let mut body_open: Option<usize> = None;
    let mut body_quote = false;
    let mut i = 0usize;

    while i < len {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            Region::Code => {
                let opened = match (b, next) {
                    (b'\'', _) => Some((Region::Literal, 1)),
                    (b'"', _) => Some((Region::QuotedIdent, 1)),
                    (b'-', Some(b'-')) => Some((Region::LineComment, 2)),
                    (b'/', Some(b'*')) => Some((Region::BlockComment, 2)),
                    (b'$', Some(b'$')) => Some((Region::Body, 2)),
                    _ => None,
                };
                match opened {
                    Some((region, width)) => {
                        out.close(Region::Code, start, i);
                        start = i;
                        if region == Region::Body {
                            body_open = Some(i);
                            body_quote = false;
                        }
                        state = region;
                        i += width;
                    }
                    None => i += 1,
                }
            }
            Region::Literal | Region::QuotedIdent => {
                let quote = if state == Region::Literal { b'\'' } else { b'"' };
                if b == b'\\' {
                    i += 2;
                } else if b == quote {
                    i += 1;
                    out.close(state, start, i);
                    start = i;
                    state = Region::Code;
                } else {
                    i += 1;
                }
            }
            Region::LineComment => {
                if b == b'\n' {
                    out.close(state, start, i);
                    start = i;
                    state = resume(body_open);
                } else {
                    i += 1;
                }
            }
            Region::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    i += 2;
                    out.close(state, start, i);
                    start = i;
                    state = resume(body_open);
                } else {
                    i += 1;
                }
            }
            Region::Body => {
                if b == b'$' && next == Some(b'$') {
                    i += 2;
                    out.close(state, start, i);
                    start = i;
                    state = Region::Code;
                    body_open = None;
                } else if body_quote {
                    if b == b'\\' {
                        i += 2;
                    } else {
                        body_quote = b != b'\'';
                        i += 1;
                    }
                } else {
                    let comment = match (b, next) {
                        (b'-', Some(b'-')) => Some(Region::LineComment),
                        (b'/', Some(b'*')) => Some(Region::BlockComment),
                        _ => None,
                    };
                    if let Some(region) = comment {
                        out.close(Region::Body, start, i);
                        start = i;
                        state = region;
                        i += 2;
                    } else {
                        body_quote = b == b'\'';
                        i += 1;
                    }
                }
            }
        }
    }

    out.close(state, start.min(len), len);
    out.unterminated = match (body_open, state) {
        (Some(offset), _) => Some(Unterminated {
            region: Region::Body,
            offset,
        }),
        (None, Region::Code | Region::LineComment) => None,
        (None, region) => Some(Unterminated {
            region,
            offset: start.min(len),
        }),
    };
    out
}

fn resume(body_open: Option<usize>) -> Region {
    if body_open.is_some() {
        Region::Body
    } else {
        Region::Code
    }
}

/// Remove every comment from `text`.
///
/// Line comments disappear up to their newline. A block comment spanning
/// lines is replaced by its newlines, a single-line one by a space, so line
/// numbers of the result match the input.
pub fn strip_comments(text: &str) -> String {
    let scan = scan(text);
    let mut out = String::with_capacity(text.len());
    for span in &scan.spans {
        let slice = &text[span.start..span.end];
        match span.region {
            Region::LineComment => {}
            Region::BlockComment => {
                let newlines = slice.matches('\n').count();
                if newlines == 0 {
                    out.push(' ');
                } else {
                    out.extend(std::iter::repeat('\n').take(newlines));
                }
            }
            _ => out.push_str(slice),
        }
    }
    out
}

/// 1-based line number of a byte offset.
pub fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}
