//! Issue types produced while wrapping literals.
//!
//! Each issue is self-contained with all information needed by the reporter
//! to display it. Failures are file-scoped; warnings are literal-scoped.

use enum_dispatch::enum_dispatch;

use crate::core::{registry::ContextTag, source::SourceContext};

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    ScanError,
    RewriteConflict,
    FileError,
    CommentFailure,
    Interpolation,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::ScanError => write!(f, "scan-error"),
            Rule::RewriteConflict => write!(f, "rewrite-conflict"),
            Rule::FileError => write!(f, "file-error"),
            Rule::CommentFailure => write!(f, "comment-failure"),
            Rule::Interpolation => write!(f, "interpolation"),
        }
    }
}

// ============================================================
// Issue Structs
// ============================================================

/// Unterminated literal, interpolation, or block comment. The file is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailureIssue {
    pub context: SourceContext,
    pub message: String,
}

/// Two planned edits overlap. The file is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConflictIssue {
    pub file_path: String,
    pub message: String,
}

/// The file could not be read or written, or does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailureIssue {
    pub file_path: String,
    pub message: String,
}

/// The comment generator failed or timed out. The literal is left bare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFailureIssue {
    pub context: SourceContext,
    pub text: String,
    pub tag: ContextTag,
    pub error: String,
}

/// A UI literal containing `\(...)`. It is never wrapped automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolatedLiteralIssue {
    pub context: SourceContext,
    pub text: String,
    pub tag: ContextTag,
}

impl ScanFailureIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }
    pub fn rule() -> Rule {
        Rule::ScanError
    }
}

impl RewriteConflictIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }
    pub fn rule() -> Rule {
        Rule::RewriteConflict
    }
}

impl FileFailureIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }
    pub fn rule() -> Rule {
        Rule::FileError
    }
}

impl CommentFailureIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }
    pub fn rule() -> Rule {
        Rule::CommentFailure
    }
}

impl InterpolatedLiteralIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }
    pub fn rule() -> Rule {
        Rule::Interpolation
    }
}

// ============================================================
// Issue Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    ScanFailure(ScanFailureIssue),
    RewriteConflict(RewriteConflictIssue),
    FileFailure(FileFailureIssue),
    CommentFailure(CommentFailureIssue),
    InterpolatedLiteral(InterpolatedLiteralIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }

    /// True for issues that mean the file was not processed.
    pub fn is_file_failure(&self) -> bool {
        self.severity() == Severity::Error
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceContext),
    /// File-level only (no line context).
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for ScanFailureIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("the file was left unchanged")
    }
}

impl Report for RewriteConflictIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for FileFailureIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for CommentFailureIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("\"{}\"", self.text)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("{} ({}); literal left unwrapped", self.error, self.tag))
    }
}

impl Report for InterpolatedLiteralIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("\"{}\"", self.text)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("{} literal contains interpolation", self.tag))
    }

    fn hint(&self) -> Option<&str> {
        Some("localize it by hand, e.g. with a format string and arguments")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::SourceLocation;

    #[test]
    fn test_severity_by_kind() {
        let context = SourceContext::new(SourceLocation::new("./A.swift", 3, 9), "Text(\"a\")");
        let scan = Issue::from(ScanFailureIssue {
            context: context.clone(),
            message: "unterminated string literal".into(),
        });
        let interpolated = Issue::from(InterpolatedLiteralIssue {
            context,
            text: "Hi \\(name)".into(),
            tag: ContextTag::LabelText,
        });
        assert!(scan.is_file_failure());
        assert_eq!(scan.rule(), Rule::ScanError);
        assert!(!interpolated.is_file_failure());
        assert_eq!(interpolated.rule().to_string(), "interpolation");
    }

    #[test]
    fn test_comment_failure_details() {
        let issue = CommentFailureIssue {
            context: SourceContext::new(SourceLocation::new("./A.swift", 1, 6), "Text(\"a\")"),
            text: "a".into(),
            tag: ContextTag::LabelText,
            error: "comment generator timed out after 10ms".into(),
        };
        assert_eq!(
            issue.details().unwrap(),
            "comment generator timed out after 10ms (label-text); literal left unwrapped"
        );
    }
}
