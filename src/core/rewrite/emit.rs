use std::collections::HashSet;

use unicode_width::UnicodeWidthStr;

use super::{EditOperation, Layout, LocalizationCall, WrapperSyntax};
use crate::core::{
    classify::Frame,
    comments::escape_comment,
    registry::{ContextTag, Emission},
    scanner::LiteralSpan,
    source::LineIndex,
};

/// Words of the literal used to build a binding name.
const NAME_WORDS: usize = 3;

/// Extra indentation of the arguments in the expanded layout.
const ARGUMENT_INDENT: &str = "    ";

/// Allocates `let` names for hoisted literals, unique within one file.
#[derive(Debug, Clone, Default)]
pub struct BindingNames {
    used: HashSet<String>,
}

impl BindingNames {
    /// `used` are the identifiers already present in the file.
    pub fn new(used: HashSet<String>) -> Self {
        Self { used }
    }

    pub fn allocate(&mut self, span: &LiteralSpan, tag: ContextTag) -> String {
        let base = binding_base(&span.raw, !span.is_raw(), tag);
        let mut name = base.clone();
        let mut n = 2;
        while self.used.contains(&name) {
            name = format!("{}{}", base, n);
            n += 1;
        }
        self.used.insert(name.clone());
        name
    }
}

fn tag_suffix(tag: ContextTag) -> &'static str {
    match tag {
        ContextTag::HeaderText => "Header",
        ContextTag::FooterText => "Footer",
        ContextTag::LabelText | ContextTag::Unknown => "Text",
        ContextTag::AlertTitle => "AlertTitle",
        ContextTag::AlertMessage => "AlertMessage",
        ContextTag::ControlLabel => "Label",
        ContextTag::NavigationTitle => "Title",
    }
}

/// `Eingabe der Pin` + header → `eingabeDerPinHeader`.
///
/// Only plain ASCII words starting with a letter are used; escape
/// sequences separate words. In `#"..."#` literals a backslash is an
/// ordinary character. Without any such word the base is `localized`.
fn binding_base(raw: &str, escapes: bool, tag: ContextTag) -> String {
    let mut plain = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if escapes && c == '\\' {
            chars.next();
            plain.push(' ');
        } else {
            plain.push(c);
        }
    }

    let words: Vec<&str> = plain
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().next().is_some_and(|c| c.is_ascii_alphabetic()))
        .filter(|w| w.chars().all(|c| c.is_ascii_alphanumeric()))
        .take(NAME_WORDS)
        .collect();

    let mut base = String::new();
    for (i, word) in words.iter().enumerate() {
        let lower = word.to_ascii_lowercase();
        if i == 0 {
            base.push_str(&lower);
        } else {
            let mut rest = lower.chars();
            if let Some(first) = rest.next() {
                base.push(first.to_ascii_uppercase());
                base.push_str(rest.as_str());
            }
        }
    }
    if base.is_empty() {
        base.push_str("localized");
    }
    base.push_str(tag_suffix(tag));
    base
}

fn starts_with_word(line: &str, word: &str) -> bool {
    line.strip_prefix(word)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
}

/// Plans the edits for one file, literal by literal.
pub struct Rewriter<'a> {
    text: &'a str,
    index: LineIndex<'a>,
    wrapper: &'a WrapperSyntax,
    layout: Layout,
    max_line_width: usize,
    names: BindingNames,
}

impl<'a> Rewriter<'a> {
    pub fn new(
        text: &'a str,
        wrapper: &'a WrapperSyntax,
        layout: Layout,
        max_line_width: usize,
        names: BindingNames,
    ) -> Self {
        Self {
            text,
            index: LineIndex::new(text),
            wrapper,
            layout,
            max_line_width,
            names,
        }
    }

    /// Edits wrapping `span`. Hoisting falls back to a direct replacement
    /// when there is no statement line to put the binding above.
    pub fn edits_for(
        &mut self,
        span: &LiteralSpan,
        frames: &[Frame],
        emission: Emission,
        call: &LocalizationCall,
    ) -> Vec<EditOperation> {
        if emission == Emission::Hoisted
            && let Some(anchor) = self.hoist_anchor(frames)
        {
            return self.hoisted(span, anchor, call);
        }

        let indent = self.index.indentation(span.start);
        let eol = self.index.line_ending(span.start);
        let (prefix, suffix) = match emission {
            Emission::WrapInText => ("Text(", ")"),
            Emission::Direct | Emission::Hoisted => ("", ""),
        };
        let inline = format!("{}{}{}", prefix, self.render(call, None), suffix);
        let line = self.index.line_text(span.start);
        let width = (line.width() + inline.width()).saturating_sub(span.source(self.text).width());
        let replacement = if self.expand(width) {
            format!("{}{}{}", prefix, self.render(call, Some((indent, eol))), suffix)
        } else {
            inline
        };
        vec![EditOperation::replace(span.range(), replacement)]
    }

    fn hoisted(&mut self, span: &LiteralSpan, anchor: usize, call: &LocalizationCall) -> Vec<EditOperation> {
        let name = self.names.allocate(span, call.tag);
        let indent = self.index.indentation(anchor);
        let eol = self.index.line_ending(anchor);

        let head = format!("{}let {} = ", indent, name);
        let inline = self.render(call, None);
        let value = if self.expand(head.width() + inline.width()) {
            self.render(call, Some((indent, eol)))
        } else {
            inline
        };
        vec![
            EditOperation::insert(self.index.line_start(anchor), format!("{}{}{}", head, value, eol)),
            EditOperation::replace(span.range(), name),
        ]
    }

    fn expand(&self, width: usize) -> bool {
        match self.layout {
            Layout::Inline => false,
            Layout::Expanded => true,
            Layout::Auto => width > self.max_line_width,
        }
    }

    /// The wrapper call; `expanded` carries the line's indentation and ending.
    fn render(&self, call: &LocalizationCall, expanded: Option<(&str, &str)>) -> String {
        let comment = escape_comment(&call.comment);
        let WrapperSyntax {
            function,
            value_label,
            comment_label,
        } = self.wrapper;
        match expanded {
            None => format!(
                "{}({}: {}, {}: \"{}\")",
                function, value_label, call.literal, comment_label, comment
            ),
            Some((indent, eol)) => format!(
                "{function}({eol}{indent}{ARGUMENT_INDENT}{value_label}: {literal},{eol}{indent}{ARGUMENT_INDENT}{comment_label}: \"{comment}\")",
                literal = call.literal,
            ),
        }
    }

    /// Start of the statement a binding can be inserted above.
    ///
    /// That is the outermost call around the literal before the first
    /// closure or collection. The closure must be the trailing closure of a
    /// view call (a builder body, where `let` is allowed), the statement
    /// must begin on its own line inside it, and the line must be neither a
    /// modifier continuation (`.alert(...)`) nor a `case` label.
    fn hoist_anchor(&self, frames: &[Frame]) -> Option<usize> {
        let outermost = frames.iter().map_while(Frame::as_call).last()?;
        let anchor = outermost.name_start;
        let line_start = self.index.line_start(anchor);

        let Some(Frame::Closure(closure)) = frames.iter().find(|f| f.as_call().is_none()) else {
            return None;
        };
        if closure.owner.is_none() || line_start <= closure.open {
            return None;
        }
        let line = self.index.line_text(anchor).trim_start();
        if line.starts_with('.') || starts_with_word(line, "case") || starts_with_word(line, "default") {
            return None;
        }
        Some(anchor)
    }
}
