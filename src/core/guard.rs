//! Idempotency guard: recognizes literals that are already wrapped.

use crate::core::{
    classify::{CodeView, Frame},
    rewrite::WrapperSyntax,
};

/// Labels that select SwiftUI's own localized `Text` initializers.
const LOCALIZED_TEXT_LABELS: &[&str] = &["comment", "tableName", "bundle"];

/// True when the literal sits directly in a complete wrapper call, as the
/// value or the comment argument, or is the key of an already localized
/// `Text("Hello", tableName: "Main")`.
///
/// A call that only has one of the two labels (e.g. `String(localized: key)`
/// written by hand with a table name) is not treated as ours.
pub fn is_inert(view: &CodeView, frames: &[Frame], wrapper: &WrapperSyntax) -> bool {
    let Some(Frame::Call(call)) = frames.first() else {
        return false;
    };
    if call.is_modifier {
        return false;
    }
    if call.name == "Text"
        && view
            .call_labels(call.open)
            .iter()
            .any(|l| LOCALIZED_TEXT_LABELS.contains(&l.as_str()))
    {
        return true;
    }
    if call.name != wrapper.function {
        return false;
    }
    let in_wrapper_slot = matches!(
        call.arg_label.as_deref(),
        Some(label) if label == wrapper.value_label || label == wrapper.comment_label
    );
    if !in_wrapper_slot {
        return false;
    }
    let labels = view.call_labels(call.open);
    labels.iter().any(|l| *l == wrapper.value_label)
        && labels.iter().any(|l| *l == wrapper.comment_label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::{scan, scan_literals};

    fn inert(text: &str) -> Vec<bool> {
        let view = CodeView::new(text, &scan(text).unwrap());
        let wrapper = WrapperSyntax::default();
        scan_literals(text)
            .unwrap()
            .iter()
            .map(|span| is_inert(&view, &view.frames_at(span.start), &wrapper))
            .collect()
    }

    #[test]
    fn test_wrapped_value_and_comment_are_inert() {
        assert_eq!(
            inert(r#"Text(String(localized: "Settings", comment: "Title"))"#),
            vec![true, true]
        );
    }

    #[test]
    fn test_expanded_layout_is_inert() {
        let text = "let a = String(\n    localized: \"\"\"\nLine\n\"\"\", comment: \"\")";
        assert_eq!(inert(text), vec![true, true]);
    }

    #[test]
    fn test_localized_text_initializers_are_inert() {
        assert_eq!(
            inert(r#"Text("Hello", comment: "Greeting") ; Text("Hello", tableName: "Main") ; Text("Hi", bundle: .module)"#),
            vec![true, true, true, true, true]
        );
        assert_eq!(inert(r#"Text("Hello").font(.title)"#), vec![false]);
    }

    #[test]
    fn test_missing_comment_is_not_inert() {
        assert_eq!(inert(r#"String(localized: "Settings")"#), vec![false]);
    }

    #[test]
    fn test_bare_literals_are_not_inert() {
        assert_eq!(
            inert(r#"Text("Settings") ; String("x") ; foo(localized: "y", comment: "z")"#),
            vec![false, false, false, false]
        );
    }
}
