//! Small helpers shared by the engine and the CLI.

/// Checks if the text contains at least one Unicode alphabetic character.
///
/// Literals without letters (`"42"`, `"—"`, `"%@"`) are never wrapped.
///
/// # Examples
///
/// ```
/// use locwrap::utils::contains_alphabetic;
///
/// assert!(contains_alphabetic("Settings"));
/// assert!(contains_alphabetic("Einstellungen 2"));
/// assert!(!contains_alphabetic("1.0"));
/// assert!(!contains_alphabetic("%@"));
/// ```
pub fn contains_alphabetic(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic())
}

/// `"file"` or `"files"`.
pub fn plural(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 { singular } else { plural }
}

/// Remove ANSI color codes from captured output.
#[cfg(test)]
pub(crate) fn strip_ansi(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}
