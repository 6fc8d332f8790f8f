//! Literal scanner.
//!
//! Lexes Swift source text into string literal spans and comment spans.
//! Everything else is code and is left for the classifier to look at through
//! a masked view (see [`crate::core::classify::CodeView`]).
//!
//! The scanner is a small state machine:
//!
//! ```text
//! Normal ──"──▶ InSingleLineLiteral ──\(──▶ InInterpolation(depth)
//!   │ ──"""──▶ InMultiLineLiteral ──\(──▶ InInterpolation(depth)
//!   │ ──//──▶ InLineComment
//!   └ ──/*──▶ InBlockComment (nests)
//! ```
//!
//! Interpolated expressions may contain parentheses, nested literals, and
//! comments; the scanner recurses into them so that a quote inside `\( )`
//! never ends the outer literal.


use std::ops::Range;

use thiserror::Error;

/// Single-line (`"..."`) or multi-line (`"""..."""`) literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralForm {
    SingleLine,
    MultiLine,
}

/// One string literal in the source.
///
/// `start..end` covers the whole literal including delimiters (and any `#`
/// extended-delimiter marks). `raw` is the exact text between the
/// delimiters, escapes not decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralSpan {
    pub start: usize,
    pub end: usize,
    pub raw: String,
    pub form: LiteralForm,
    /// Number of `#` marks in an extended delimiter (`#"..."#` → 1).
    pub hashes: usize,
    pub contains_escapes: bool,
    pub contains_interpolation: bool,
}

impl LiteralForm {
    /// Length of the quote run that opens and closes this form.
    fn delimiter_len(self) -> usize {
        match self {
            LiteralForm::SingleLine => 1,
            LiteralForm::MultiLine => 3,
        }
    }
}

impl LiteralSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Written with an extended delimiter (`#"..."#`).
    pub fn is_raw(&self) -> bool {
        self.hashes > 0
    }

    /// The literal exactly as written, delimiters included.
    pub fn source<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Output of the scanner: a literal or a comment (line or block).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme {
    Literal(LiteralSpan),
    Comment(Range<usize>),
}

impl Lexeme {
    pub fn range(&self) -> Range<usize> {
        match self {
            Lexeme::Literal(span) => span.range(),
            Lexeme::Comment(range) => range.clone(),
        }
    }
}

/// Malformed input at end of file (or end of line for single-line literals).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedLiteral { offset: usize },
    #[error("unbalanced interpolation starting at offset {offset}")]
    UnterminatedInterpolation { offset: usize },
    #[error("unterminated block comment starting at offset {offset}")]
    UnterminatedComment { offset: usize },
}

impl ScanError {
    pub fn offset(&self) -> usize {
        match self {
            ScanError::UnterminatedLiteral { offset }
            | ScanError::UnterminatedInterpolation { offset }
            | ScanError::UnterminatedComment { offset } => *offset,
        }
    }
}

/// Top-level lexer states.
///
/// Interpolation depth is tracked separately while skipping `\( )`, since it
/// only ever occurs inside one of the literal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InLineComment,
    InBlockComment,
    InSingleLineLiteral { hashes: usize },
    InMultiLineLiteral { hashes: usize },
}

/// Where a literal body ended and what it contained.
struct LiteralBody {
    content_end: usize,
    end: usize,
    contains_escapes: bool,
    contains_interpolation: bool,
}

/// Lazy, restartable scanner over one file.
///
/// Cloning a scanner restarts nothing; it forks the iteration at the current
/// position. Use [`Scanner::new`] again to restart from the beginning.
/// After the first error the iterator is fused.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            failed: false,
        }
    }

    fn peek(&self, at: usize) -> Option<u8> {
        self.bytes.get(at).copied()
    }

    fn starts_with(&self, at: usize, pat: &[u8]) -> bool {
        self.bytes.get(at..at + pat.len()) == Some(pat)
    }

    /// Advance through code until the start of the next literal or comment.
    fn next_lexeme(&mut self) -> Option<Result<Lexeme, ScanError>> {
        let mut state = State::Normal;
        while self.pos < self.bytes.len() {
            let at = self.pos;
            match state {
                State::Normal => {
                    if self.starts_with(at, b"//") {
                        state = State::InLineComment;
                    } else if self.starts_with(at, b"/*") {
                        state = State::InBlockComment;
                    } else if let Some(hashes) = self.literal_opening(at) {
                        state = if self.starts_with(at + hashes, b"\"\"\"") {
                            State::InMultiLineLiteral { hashes }
                        } else {
                            State::InSingleLineLiteral { hashes }
                        };
                    } else {
                        self.pos += 1;
                    }
                }
                State::InLineComment => {
                    let end = self.skip_line_comment(at);
                    self.pos = end;
                    return Some(Ok(Lexeme::Comment(at..end)));
                }
                State::InBlockComment => {
                    return Some(self.skip_block_comment(at).map(|end| {
                        self.pos = end;
                        Lexeme::Comment(at..end)
                    }));
                }
                State::InSingleLineLiteral { hashes } => {
                    return Some(
                        self.lex_literal(at, hashes, LiteralForm::SingleLine)
                            .map(Lexeme::Literal),
                    );
                }
                State::InMultiLineLiteral { hashes } => {
                    return Some(
                        self.lex_literal(at, hashes, LiteralForm::MultiLine)
                            .map(Lexeme::Literal),
                    );
                }
            }
        }
        None
    }

    /// If a literal opens at `at`, return its number of `#` marks.
    fn literal_opening(&self, at: usize) -> Option<usize> {
        let hashes = self.bytes[at..].iter().take_while(|b| **b == b'#').count();
        (self.peek(at + hashes) == Some(b'"')).then_some(hashes)
    }

    fn lex_literal(
        &mut self,
        start: usize,
        hashes: usize,
        form: LiteralForm,
    ) -> Result<LiteralSpan, ScanError> {
        let content_start = start + hashes + form.delimiter_len();
        let body = self.literal_body(start, content_start, hashes, form)?;
        self.pos = body.end;
        Ok(LiteralSpan {
            start,
            end: body.end,
            raw: self.text[content_start..body.content_end].to_string(),
            form,
            hashes,
            contains_escapes: body.contains_escapes,
            contains_interpolation: body.contains_interpolation,
        })
    }

    /// Scan a literal body starting at `from`, returning where it closes.
    fn literal_body(
        &self,
        start: usize,
        from: usize,
        hashes: usize,
        form: LiteralForm,
    ) -> Result<LiteralBody, ScanError> {
        let close = &b"\"\"\""[..form.delimiter_len()];
        let mut contains_escapes = false;
        let mut contains_interpolation = false;
        let mut i = from;

        while i < self.bytes.len() {
            let b = self.bytes[i];
            if b == b'\\' && self.hash_run(i + 1) >= hashes {
                // Escape introducer: `\` followed by exactly the delimiter's `#` marks.
                let after = i + 1 + hashes;
                match self.peek(after) {
                    Some(b'(') => {
                        contains_interpolation = true;
                        i = self.skip_interpolation(after + 1, i)?;
                    }
                    Some(b'\n' | b'\r') if form == LiteralForm::SingleLine => {
                        return Err(ScanError::UnterminatedLiteral { offset: start });
                    }
                    Some(_) => {
                        contains_escapes = true;
                        i = after + self.char_len(after);
                    }
                    None => return Err(ScanError::UnterminatedLiteral { offset: start }),
                }
                continue;
            }
            if self.starts_with(i, close) && self.hash_run(i + close.len()) >= hashes {
                return Ok(LiteralBody {
                    content_end: i,
                    end: i + close.len() + hashes,
                    contains_escapes,
                    contains_interpolation,
                });
            }
            if form == LiteralForm::SingleLine && (b == b'\n' || b == b'\r') {
                return Err(ScanError::UnterminatedLiteral { offset: start });
            }
            i += 1;
        }
        Err(ScanError::UnterminatedLiteral { offset: start })
    }

    /// Skip an interpolated expression; `from` is just past `\(`.
    ///
    /// Returns the offset just past the matching `)`.
    fn skip_interpolation(&self, from: usize, opened_at: usize) -> Result<usize, ScanError> {
        let mut depth = 1usize;
        let mut i = from;
        while depth > 0 {
            let Some(b) = self.peek(i) else {
                return Err(ScanError::UnterminatedInterpolation { offset: opened_at });
            };
            if self.starts_with(i, b"//") {
                i = self.skip_line_comment(i);
                continue;
            }
            if self.starts_with(i, b"/*") {
                i = self.skip_block_comment(i)?;
                continue;
            }
            if let Some(hashes) = self.literal_opening(i) {
                let form = if self.starts_with(i + hashes, b"\"\"\"") {
                    LiteralForm::MultiLine
                } else {
                    LiteralForm::SingleLine
                };
                let body = self
                    .literal_body(i, i + hashes + form.delimiter_len(), hashes, form)
                    .map_err(|_| ScanError::UnterminatedInterpolation { offset: opened_at })?;
                i = body.end;
                continue;
            }
            match b {
                b'(' => depth += 1,
                b')' => depth -= 1,
                _ => {}
            }
            i += 1;
        }
        Ok(i)
    }

    /// Returns the offset of the line terminator (or end of text).
    fn skip_line_comment(&self, from: usize) -> usize {
        self.bytes[from..]
            .iter()
            .position(|b| *b == b'\n' || *b == b'\r')
            .map(|p| from + p)
            .unwrap_or(self.bytes.len())
    }

    /// Swift block comments nest. Returns the offset just past the final `*/`.
    fn skip_block_comment(&self, from: usize) -> Result<usize, ScanError> {
        let mut depth = 0usize;
        let mut i = from;
        while i < self.bytes.len() {
            if self.starts_with(i, b"/*") {
                depth += 1;
                i += 2;
            } else if self.starts_with(i, b"*/") {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return Ok(i);
                }
            } else {
                i += 1;
            }
        }
        Err(ScanError::UnterminatedComment { offset: from })
    }

    fn hash_run(&self, at: usize) -> usize {
        self.bytes
            .get(at..)
            .map(|rest| rest.iter().take_while(|b| **b == b'#').count())
            .unwrap_or(0)
    }

    /// Byte length of the UTF-8 character starting at `at`.
    fn char_len(&self, at: usize) -> usize {
        self.text[at..].chars().next().map(char::len_utf8).unwrap_or(1)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Lexeme, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_lexeme();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

/// Scan a whole file, stopping at the first error.
pub fn scan(text: &str) -> Result<Vec<Lexeme>, ScanError> {
    Scanner::new(text).collect()
}

/// Only the literal spans of a file, in source order.
pub fn scan_literals(text: &str) -> Result<Vec<LiteralSpan>, ScanError> {
    Scanner::new(text)
        .filter_map(|lexeme| match lexeme {
            Ok(Lexeme::Literal(span)) => Some(Ok(span)),
            Ok(Lexeme::Comment(_)) => None,
            Err(e) => Some(Err(e)),
        })
        .collect()
}
