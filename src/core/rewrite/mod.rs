//! Rewrite engine.
//!
//! Turns accepted literals into [`EditOperation`]s and splices them into the
//! original text. Bytes outside the edited ranges are copied unchanged.

mod emit;

pub use emit::{BindingNames, Rewriter};

use std::{fmt, ops::Range, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::registry::ContextTag;

/// Replace `range` with `replacement`. An empty range is an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    pub range: Range<usize>,
    pub replacement: String,
}

impl EditOperation {
    pub fn replace(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty()
    }
}

/// One literal to wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationCall {
    /// The literal exactly as written, delimiters included.
    pub literal: String,
    /// Comment as returned by the generator, not yet escaped.
    pub comment: String,
    pub tag: ContextTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("overlapping edits at {first:?} and {second:?}")]
    Conflict {
        first: Range<usize>,
        second: Range<usize>,
    },
    #[error("edit {range:?} is outside the source text")]
    OutOfBounds { range: Range<usize> },
}

/// Names making up the wrapper call: `String(localized: ..., comment: ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapperSyntax {
    #[serde(default = "default_function")]
    pub function: String,
    #[serde(default = "default_value_label")]
    pub value_label: String,
    #[serde(default = "default_comment_label")]
    pub comment_label: String,
}

fn default_function() -> String {
    "String".to_string()
}

fn default_value_label() -> String {
    "localized".to_string()
}

fn default_comment_label() -> String {
    "comment".to_string()
}

impl Default for WrapperSyntax {
    fn default() -> Self {
        Self {
            function: default_function(),
            value_label: default_value_label(),
            comment_label: default_comment_label(),
        }
    }
}

/// How the wrapper call is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `String(localized: "...", comment: "...")` on one line.
    #[default]
    Inline,
    /// One argument per line, one indentation level deeper.
    Expanded,
    /// Inline unless the line would exceed the maximum width.
    Auto,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(Layout::Inline),
            "expanded" => Ok(Layout::Expanded),
            "auto" => Ok(Layout::Auto),
            other => Err(format!(
                "unknown layout '{}' (expected inline, expanded, or auto)",
                other
            )),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Inline => write!(f, "inline"),
            Layout::Expanded => write!(f, "expanded"),
            Layout::Auto => write!(f, "auto"),
        }
    }
}

/// Reject edits that overlap. Insertions may share a position with each
/// other and with the start or end of a replacement.
pub fn check_edits(text: &str, edits: &[EditOperation]) -> Result<(), RewriteError> {
    let mut sorted: Vec<&EditOperation> = edits.iter().collect();
    sorted.sort_by_key(|edit| (edit.range.start, edit.range.end));

    for edit in &sorted {
        let in_bounds = edit.range.start <= edit.range.end
            && edit.range.end <= text.len()
            && text.is_char_boundary(edit.range.start)
            && text.is_char_boundary(edit.range.end);
        if !in_bounds {
            return Err(RewriteError::OutOfBounds {
                range: edit.range.clone(),
            });
        }
    }
    for pair in sorted.windows(2) {
        if pair[1].range.start < pair[0].range.end {
            return Err(RewriteError::Conflict {
                first: pair[0].range.clone(),
                second: pair[1].range.clone(),
            });
        }
    }
    Ok(())
}

/// Apply `edits` to `text`, in strictly descending start order.
///
/// At a shared start, the replacement is applied before the insertions, and
/// insertions are applied in reverse creation order so that they end up in
/// creation order in the output.
pub fn apply_edits(text: &str, edits: &[EditOperation]) -> Result<String, RewriteError> {
    check_edits(text, edits)?;

    let mut order: Vec<usize> = (0..edits.len()).collect();
    order.sort_by(|a, b| {
        let (ea, eb) = (&edits[*a], &edits[*b]);
        eb.range
            .start
            .cmp(&ea.range.start)
            .then(eb.range.end.cmp(&ea.range.end))
            .then(b.cmp(a))
    });

    let mut output = text.to_string();
    for index in order {
        let edit = &edits[index];
        output.replace_range(edit.range.clone(), &edit.replacement);
    }
    Ok(output)
}
