//! Declarative table of literal-bearing constructs.
//!
//! Each entry says: a literal that is the whole argument in `slot` of
//! `construct` (optionally only when that call sits inside `within`) plays
//! the role `tag` and is rewritten with `emission`. Adding a construct means
//! adding a row, not touching the scanner or the rewrite engine.

use serde::{Deserialize, Serialize};

use crate::core::classify::{CallFrame, Frame};

/// Role a literal plays in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextTag {
    LabelText,
    HeaderText,
    FooterText,
    AlertTitle,
    AlertMessage,
    ControlLabel,
    NavigationTitle,
    Unknown,
}

impl ContextTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextTag::LabelText => "label-text",
            ContextTag::HeaderText => "header-text",
            ContextTag::FooterText => "footer-text",
            ContextTag::AlertTitle => "alert-title",
            ContextTag::AlertMessage => "alert-message",
            ContextTag::ControlLabel => "control-label",
            ContextTag::NavigationTitle => "navigation-title",
            ContextTag::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ContextTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the rewritten code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Emission {
    /// Replace the literal with the wrapper call.
    #[default]
    Direct,
    /// Bind the wrapper call to a new `let` above the statement and
    /// reference it in place of the literal.
    Hoisted,
    /// Replace the literal with `Text(<wrapper call>)`.
    WrapInText,
}

/// Which argument of a call an entry applies to.
///
/// `0` is the first unlabelled argument; `"header"` is `header: ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgSlot {
    Position(usize),
    Label(String),
}

impl ArgSlot {
    fn matches(&self, call: &CallFrame) -> bool {
        match self {
            ArgSlot::Position(index) => call.arg_label.is_none() && call.arg_index == *index,
            ArgSlot::Label(label) => call.arg_label.as_deref() == Some(label.as_str()),
        }
    }
}

/// Requirement on the frame directly enclosing the matched call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParentConstraint {
    /// The call is argument `argument` of `call`.
    Call { call: String, argument: ArgSlot },
    /// The call is inside the trailing closure labelled `closure` of `owner`.
    Closure { closure: String, owner: String },
}

impl ParentConstraint {
    fn matches(&self, parent: Option<&Frame>) -> bool {
        match (self, parent) {
            (ParentConstraint::Call { call, argument }, Some(Frame::Call(frame))) => {
                frame.construct() == *call && argument.matches(frame)
            }
            (ParentConstraint::Closure { closure, owner }, Some(Frame::Closure(frame))) => {
                frame.label.as_deref() == Some(closure.as_str())
                    && frame.owner.as_deref() == Some(owner.as_str())
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    /// `Text` for an initializer, `.alert` for a modifier.
    pub construct: String,
    pub slot: ArgSlot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub within: Option<ParentConstraint>,
    pub tag: ContextTag,
    #[serde(default)]
    pub emission: Emission,
}

impl RegistryEntry {
    pub fn new(construct: &str, slot: ArgSlot, tag: ContextTag, emission: Emission) -> Self {
        Self {
            construct: construct.to_string(),
            slot,
            within: None,
            tag,
            emission,
        }
    }

    pub fn within(mut self, constraint: ParentConstraint) -> Self {
        self.within = Some(constraint);
        self
    }

    fn matches(&self, frames: &[Frame]) -> bool {
        let Some(Frame::Call(call)) = frames.first() else {
            return false;
        };
        if call.construct() != self.construct || !self.slot.matches(call) {
            return false;
        }
        match &self.within {
            Some(constraint) => constraint.matches(frames.get(1)),
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Build a registry from `entries`, most specific first.
    ///
    /// Entries with a parent constraint are tried before unconstrained
    /// ones; otherwise the given order is kept.
    pub fn new(entries: Vec<RegistryEntry>) -> Self {
        let (mut constrained, unconstrained): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|e| e.within.is_some());
        constrained.extend(unconstrained);
        Self {
            entries: constrained,
        }
    }

    /// Default SwiftUI table, with `extra` entries taking precedence.
    pub fn with_extra(extra: &[RegistryEntry]) -> Self {
        let mut entries = extra.to_vec();
        entries.extend(default_entries());
        Self::new(entries)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// First entry matching the enclosing frames (innermost first).
    pub fn lookup(&self, frames: &[Frame]) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.matches(frames))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(default_entries())
    }
}

const CONTROLS: &[&str] = &[
    "Button",
    "Toggle",
    "Picker",
    "TextField",
    "SecureField",
    "Link",
    "Menu",
    "Stepper",
    "NavigationLink",
];

const ALERT_MODIFIERS: &[&str] = &[".alert", ".confirmationDialog"];

const TITLE_MODIFIERS: &[&str] = &[".navigationBarTitle", ".navigationTitle"];

fn default_entries() -> Vec<RegistryEntry> {
    use ArgSlot::{Label, Position};
    use ContextTag::*;
    use Emission::*;

    let text = |tag, emission| RegistryEntry::new("Text", Position(0), tag, emission);
    let mut entries = vec![
        text(HeaderText, Hoisted).within(ParentConstraint::Call {
            call: "Section".into(),
            argument: Label("header".into()),
        }),
        text(FooterText, Hoisted).within(ParentConstraint::Call {
            call: "Section".into(),
            argument: Label("footer".into()),
        }),
        text(AlertTitle, Direct).within(ParentConstraint::Call {
            call: "Alert".into(),
            argument: Label("title".into()),
        }),
        text(AlertMessage, Direct).within(ParentConstraint::Call {
            call: "Alert".into(),
            argument: Label("message".into()),
        }),
    ];
    for modifier in TITLE_MODIFIERS {
        entries.push(text(NavigationTitle, Direct).within(ParentConstraint::Call {
            call: modifier.to_string(),
            argument: Position(0),
        }));
    }
    for modifier in ALERT_MODIFIERS {
        entries.push(text(AlertMessage, Direct).within(ParentConstraint::Closure {
            closure: "message".into(),
            owner: modifier.to_string(),
        }));
    }

    entries.push(text(LabelText, Direct));
    entries.push(RegistryEntry::new("Label", Position(0), LabelText, Direct));
    entries.extend(
        CONTROLS
            .iter()
            .map(|name| RegistryEntry::new(name, Position(0), ControlLabel, Direct)),
    );
    entries.extend(
        ALERT_MODIFIERS
            .iter()
            .map(|name| RegistryEntry::new(name, Position(0), AlertTitle, Direct)),
    );
    entries.extend(
        TITLE_MODIFIERS
            .iter()
            .map(|name| RegistryEntry::new(name, Position(0), NavigationTitle, WrapInText)),
    );
    entries.push(RegistryEntry::new("Section", Position(0), HeaderText, Direct));
    entries.push(RegistryEntry::new("Section", Label("header".into()), HeaderText, Hoisted));
    entries.push(RegistryEntry::new("Section", Label("footer".into()), FooterText, Hoisted));
    entries
}
