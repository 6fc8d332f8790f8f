//! Context classifier.
//!
//! Decides which role a literal plays by looking at the calls and closures
//! around it and consulting the [`Registry`].

mod code_view;

pub use code_view::{CallFrame, ClosureFrame, CodeView, Frame};

use crate::core::{
    registry::{ContextTag, Emission, Registry},
    scanner::LiteralSpan,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tag: ContextTag,
    pub emission: Emission,
}

impl Classification {
    pub const UNKNOWN: Classification = Classification {
        tag: ContextTag::Unknown,
        emission: Emission::Direct,
    };

    pub fn is_unknown(&self) -> bool {
        self.tag == ContextTag::Unknown
    }
}

/// Tag `span`, given its enclosing `frames` (innermost first).
///
/// The literal has to be the entire argument of the innermost call:
/// `Text("a" + b)` and `Text(flag ? "a" : "b")` are left alone.
pub fn classify(
    view: &CodeView,
    span: &LiteralSpan,
    frames: &[Frame],
    registry: &Registry,
) -> Classification {
    let Some(Frame::Call(call)) = frames.first() else {
        return Classification::UNKNOWN;
    };
    if !view.is_whole_argument(call, span.start, span.end) {
        return Classification::UNKNOWN;
    }
    registry
        .lookup(frames)
        .map(|entry| Classification {
            tag: entry.tag,
            emission: entry.emission,
        })
        .unwrap_or(Classification::UNKNOWN)
}
