//! Masked view of a source file and enclosing-frame discovery.
//!
//! Comment bytes are blanked to spaces and literal bytes are filled with `"`
//! so that bracket matching and argument counting only ever see code, while a
//! literal still occupies a non-blank position in its argument.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::scanner::Lexeme;

/// How far outward frame discovery walks from a literal.
const MAX_FRAMES: usize = 8;

/// Words after which `Name {` or `name(...) {` is not a call with a
/// trailing closure.
const NON_CALL_KEYWORDS: &[&[u8]] = &[
    b"actor", b"any", b"class", b"enum", b"extension", b"for", b"func", b"guard", b"if",
    b"protocol", b"some", b"struct", b"switch", b"while",
];

static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap());

/// A syntactic construct enclosing a position, innermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Inside the parentheses of `name(...)` or `.name(...)`.
    Call(CallFrame),
    /// Inside a `{ ... }` block or closure.
    Closure(ClosureFrame),
    /// Inside `[ ... ]` or a call whose callee could not be named.
    Other { open: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    pub name: String,
    /// Called as a modifier: `.navigationBarTitle(...)`.
    pub is_modifier: bool,
    /// Offset of the callee name, or of its leading `.` for modifiers.
    pub name_start: usize,
    /// Offset of the `(`.
    pub open: usize,
    /// Index of the argument the inner position sits in.
    pub arg_index: usize,
    /// `label` of that argument, if written as `label: value`.
    pub arg_label: Option<String>,
    /// Offset where that argument starts (just after `(` or `,`).
    pub arg_start: usize,
}

impl CallFrame {
    /// Name the way registry entries spell it (`.alert` for modifiers).
    pub fn construct(&self) -> String {
        if self.is_modifier {
            format!(".{}", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureFrame {
    /// Offset of the `{`.
    pub open: usize,
    /// `message` for a labelled trailing closure `message: { ... }`.
    pub label: Option<String>,
    /// Construct the closure is attached to (`.alert`, `HStack`, ...).
    pub owner: Option<String>,
}

impl Frame {
    pub fn as_call(&self) -> Option<&CallFrame> {
        match self {
            Frame::Call(call) => Some(call),
            _ => None,
        }
    }
}

/// Source bytes with comments blanked and literals filled with `"`.
#[derive(Debug, Clone)]
pub struct CodeView {
    masked: Vec<u8>,
}

impl CodeView {
    pub fn new(text: &str, lexemes: &[Lexeme]) -> Self {
        let mut masked = text.as_bytes().to_vec();
        for lexeme in lexemes {
            let fill = match lexeme {
                Lexeme::Literal(_) => b'"',
                Lexeme::Comment(_) => b' ',
            };
            for b in &mut masked[lexeme.range()] {
                if *b != b'\n' && *b != b'\r' {
                    *b = fill;
                }
            }
        }
        Self { masked }
    }

    pub fn len(&self) -> usize {
        self.masked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masked.is_empty()
    }

    fn byte(&self, at: usize) -> u8 {
        self.masked[at]
    }

    /// Every identifier appearing in code (not in literals or comments).
    pub fn identifiers(&self) -> HashSet<String> {
        let code = String::from_utf8_lossy(&self.masked);
        IDENTIFIER_REGEX
            .find_iter(&code)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Enclosing frames of `pos`, innermost first.
    pub fn frames_at(&self, pos: usize) -> Vec<Frame> {
        let mut frames = Vec::new();
        let mut inner = pos;
        while frames.len() < MAX_FRAMES {
            let Some(open) = self.enclosing_open(inner) else {
                break;
            };
            let frame = match self.byte(open) {
                b'(' => self.call_frame(open, inner),
                b'{' => Frame::Closure(self.closure_frame(open)),
                _ => Frame::Other { open },
            };
            inner = match &frame {
                Frame::Call(call) => call.name_start,
                Frame::Closure(closure) => closure.open,
                Frame::Other { open } => *open,
            };
            frames.push(frame);
        }
        frames
    }

    /// Offset of the nearest unmatched `(`, `[`, or `{` before `pos`.
    fn enclosing_open(&self, pos: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = pos;
        while i > 0 {
            i -= 1;
            match self.byte(i) {
                b')' | b']' | b'}' => depth += 1,
                b'(' | b'[' | b'{' => {
                    if depth == 0 {
                        return Some(i);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        None
    }

    /// Offset of the bracket matching the closer at `close`, scanning backward.
    fn matching_open(&self, close: usize) -> Option<usize> {
        self.enclosing_open(close)
    }

    fn call_frame(&self, open: usize, inner: usize) -> Frame {
        let Some((name, name_start, is_modifier)) = self.callee_before(open) else {
            return Frame::Other { open };
        };
        let (arg_index, arg_start) = self.argument_position(open, inner);
        let arg_label = self.label_at(arg_start);
        Frame::Call(CallFrame {
            name,
            is_modifier,
            name_start,
            open,
            arg_index,
            arg_label,
            arg_start,
        })
    }

    /// Name of the callee right before `open`, skipping generic arguments.
    ///
    /// Returns the name, where it starts (its `.` for modifiers), and
    /// whether it is a modifier.
    fn callee_before(&self, open: usize) -> Option<(String, usize, bool)> {
        let mut end = self.skip_space_back(open);
        if end > 0 && self.byte(end - 1) == b'>' {
            end = self.skip_generics_back(end - 1)?;
            end = self.skip_space_back(end);
        }
        let start = self.ident_start(end);
        if start == end {
            return None;
        }
        let name = String::from_utf8_lossy(&self.masked[start..end]).into_owned();
        let before = self.skip_space_back(start);
        let is_modifier = before > 0 && self.byte(before - 1) == b'.';
        let name_start = if is_modifier { before - 1 } else { start };
        Some((name, name_start, is_modifier))
    }

    /// `end` is the offset of a `>`; returns the offset of its matching `<`.
    fn skip_generics_back(&self, end: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = end + 1;
        while i > 0 {
            i -= 1;
            match self.byte(i) {
                b'>' => depth += 1,
                b'<' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                b'(' | b')' | b'{' | b'}' | b';' => return None,
                _ => {}
            }
        }
        None
    }

    /// `lt` is the offset of a `<`; returns the offset just past its matching
    /// `>` when the brackets enclose generic arguments (`Foo<A, [B]>`), or
    /// `None` for a less-than operator.
    fn skip_generics_forward(&self, lt: usize) -> Option<usize> {
        if lt == 0 || !is_ident_byte(self.byte(lt - 1)) {
            return None;
        }
        let mut depth = 0usize;
        for i in lt..self.len() {
            match self.byte(i) {
                b'<' => depth += 1,
                b'>' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                b',' | b'.' | b'?' | b'[' | b']' | b':' => {}
                b if is_ident_byte(b) || b.is_ascii_whitespace() => {}
                _ => return None,
            }
        }
        None
    }

    /// Index of the argument containing `inner`, and where that argument starts.
    fn argument_position(&self, open: usize, inner: usize) -> (usize, usize) {
        let mut depth = 0usize;
        let mut index = 0;
        let mut arg_start = open + 1;
        let mut i = open + 1;
        while i < inner {
            match self.byte(i) {
                b'<' => {
                    if let Some(end) = self.skip_generics_forward(i).filter(|end| *end <= inner) {
                        i = end;
                        continue;
                    }
                }
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => {
                    index += 1;
                    arg_start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }
        (index, arg_start)
    }

    /// `label` when the code at `at` reads `label: ...` (but not `a ? b : c` or `::`).
    fn label_at(&self, at: usize) -> Option<String> {
        let start = self.skip_space_forward(at);
        let end = self.ident_end(start);
        if end == start {
            return None;
        }
        let colon = self.skip_space_forward(end);
        let is_label = colon < self.len()
            && self.byte(colon) == b':'
            && self.masked.get(colon + 1) != Some(&b':');
        is_label.then(|| String::from_utf8_lossy(&self.masked[start..end]).into_owned())
    }

    /// Labels of all arguments of the call opened at `open`.
    pub fn call_labels(&self, open: usize) -> Vec<String> {
        let mut labels = Vec::new();
        let mut depth = 0usize;
        let mut arg_start = open + 1;
        let mut i = open + 1;
        while i < self.len() {
            match self.byte(i) {
                b'<' => {
                    if let Some(end) = self.skip_generics_forward(i) {
                        i = end;
                        continue;
                    }
                }
                b'(' | b'[' | b'{' => depth += 1,
                b')' if depth == 0 => break,
                b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => {
                    labels.extend(self.label_at(arg_start));
                    arg_start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }
        labels.extend(self.label_at(arg_start));
        labels
    }

    fn closure_frame(&self, open: usize) -> ClosureFrame {
        let mut label = None;
        let mut at = self.skip_space_back(open);

        if at > 0 && self.byte(at - 1) == b':' {
            let end = self.skip_space_back(at - 1);
            let start = self.ident_start(end);
            if start < end {
                label = Some(String::from_utf8_lossy(&self.masked[start..end]).into_owned());
                at = self.skip_space_back(start);
            }
        }

        ClosureFrame {
            open,
            label,
            owner: self.closure_owner(at),
        }
    }

    /// The call a trailing closure ending right before `at` belongs to.
    ///
    /// Walks back over earlier trailing closures (`} label: {`) to the call.
    /// Bodies of declarations and statements (`var x: some View {`,
    /// `switch mode {`, `func f() {`) have no owner.
    fn closure_owner(&self, mut at: usize) -> Option<String> {
        loop {
            if at == 0 {
                return None;
            }
            match self.byte(at - 1) {
                b'}' => {
                    let open = self.matching_open(at - 1)?;
                    at = self.skip_space_back(open);
                    if at > 0 && self.byte(at - 1) == b':' {
                        let end = self.skip_space_back(at - 1);
                        at = self.skip_space_back(self.ident_start(end));
                    }
                }
                b')' => {
                    let open = self.matching_open(at - 1)?;
                    let (name, name_start, is_modifier) = self.callee_before(open)?;
                    if is_modifier {
                        return Some(format!(".{}", name));
                    }
                    if name == "init" || self.follows_keyword(name_start) {
                        return None;
                    }
                    return Some(name);
                }
                b if is_ident_byte(b) => {
                    let start = self.ident_start(at);
                    let name = String::from_utf8_lossy(&self.masked[start..at]).into_owned();
                    let before = self.skip_space_back(start);
                    if before > 0 && self.byte(before - 1) == b'.' {
                        return Some(format!(".{}", name));
                    }
                    let callee_like = name.starts_with(|c: char| c.is_ascii_uppercase())
                        && !(before > 0 && matches!(self.byte(before - 1), b':' | b'>' | b','))
                        && !self.follows_keyword(start);
                    return callee_like.then_some(name);
                }
                _ => return None,
            }
        }
    }

    /// True when the word right before `at` is a keyword that starts a
    /// declaration or a control-flow statement.
    fn follows_keyword(&self, at: usize) -> bool {
        let end = self.skip_space_back(at);
        let start = self.ident_start(end);
        NON_CALL_KEYWORDS.contains(&&self.masked[start..end])
    }

    /// True when the literal `start..end` is the entire argument it sits in
    /// (optionally after a `label:`).
    pub fn is_whole_argument(&self, call: &CallFrame, start: usize, end: usize) -> bool {
        let mut value_start = self.skip_space_forward(call.arg_start);
        if call.arg_label.is_some() {
            value_start = self.ident_end(value_start);
            value_start = self.skip_space_forward(value_start);
            value_start = self.skip_space_forward(value_start + 1);
        }
        if value_start != start {
            return false;
        }
        let after = self.skip_space_forward(end);
        after < self.len() && matches!(self.byte(after), b',' | b')')
    }

    fn skip_space_back(&self, mut at: usize) -> usize {
        while at > 0 && self.byte(at - 1).is_ascii_whitespace() {
            at -= 1;
        }
        at
    }

    fn skip_space_forward(&self, mut at: usize) -> usize {
        while at < self.len() && self.byte(at).is_ascii_whitespace() {
            at += 1;
        }
        at
    }

    fn ident_start(&self, mut end: usize) -> usize {
        while end > 0 && is_ident_byte(self.byte(end - 1)) {
            end -= 1;
        }
        end
    }

    fn ident_end(&self, mut start: usize) -> usize {
        while start < self.len() && is_ident_byte(self.byte(start)) {
            start += 1;
        }
        start
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
