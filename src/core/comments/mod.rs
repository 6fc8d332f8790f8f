//! Comment generators.
//!
//! A generator turns `(literal text, context tag, file)` into the comment
//! argument of the wrapper call. The engine never trusts the returned text:
//! it goes through [`escape_comment`] before it is embedded.

mod command;
mod fixed;
mod template;

pub use command::CommandGenerator;
pub use fixed::FixedGenerator;
pub use template::TemplateGenerator;

use std::{future::Future, pin::Pin};

use enum_dispatch::enum_dispatch;
use serde::Serialize;
use thiserror::Error;

use crate::core::registry::ContextTag;

/// One comment to produce. Serialized as the `command` backend's request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRequest {
    /// Literal content as written between the delimiters.
    pub text: String,
    pub context: ContextTag,
    /// File name without extension.
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("comment generator timed out after {millis}ms")]
    Timeout { millis: u64 },
    #[error("comment generator failed: {message}")]
    Backend { message: String },
}

impl GeneratorError {
    pub fn backend(message: impl Into<String>) -> Self {
        GeneratorError::Backend {
            message: message.into(),
        }
    }
}

pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String, GeneratorError>> + Send + 'a>>;

#[enum_dispatch]
pub trait CommentGenerator: Send + Sync {
    fn generate(&self, request: CommentRequest) -> GenerateFuture<'_>;
}

/// Always returns an empty comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyGenerator;

impl CommentGenerator for EmptyGenerator {
    fn generate(&self, _request: CommentRequest) -> GenerateFuture<'_> {
        Box::pin(async { Ok(String::new()) })
    }
}

/// Backend selected for a run.
#[enum_dispatch(CommentGenerator)]
#[derive(Debug, Clone)]
pub enum CommentBackend {
    Template(TemplateGenerator),
    Empty(EmptyGenerator),
    Command(CommandGenerator),
    Fixed(FixedGenerator),
}

/// Make `comment` safe to embed between the quotes of a single-line literal.
pub fn escape_comment(comment: &str) -> String {
    let mut escaped = String::with_capacity(comment.len());
    for c in comment.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_escape_comment() {
        assert_eq!(escape_comment("plain"), "plain");
        assert_eq!(escape_comment(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_comment(r"C:\dir"), r"C:\\dir");
        assert_eq!(escape_comment("two\nlines\tand\r\n"), "two lines and  ");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_empty_generator() {
        let backend = CommentBackend::from(EmptyGenerator);
        let request = CommentRequest {
            text: "Settings".into(),
            context: ContextTag::NavigationTitle,
            file: "SettingsView".into(),
        };
        assert_eq!(backend.generate(request).await.unwrap(), "");
    }

    #[test]
    fn test_request_serializes_context_tag() {
        let request = CommentRequest {
            text: "About".into(),
            context: ContextTag::HeaderText,
            file: "SettingsView".into(),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"text":"About","context":"header-text","file":"SettingsView"}"#
        );
    }
}
