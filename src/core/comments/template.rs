use super::{CommentGenerator, CommentRequest, GenerateFuture};
use crate::core::registry::ContextTag;

/// Deterministic comment built from the context and the file name,
/// e.g. `Section header in SettingsView`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn describe(tag: ContextTag) -> &'static str {
        match tag {
            ContextTag::LabelText => "Text label",
            ContextTag::HeaderText => "Section header",
            ContextTag::FooterText => "Section footer",
            ContextTag::AlertTitle => "Alert title",
            ContextTag::AlertMessage => "Alert message",
            ContextTag::ControlLabel => "Control label",
            ContextTag::NavigationTitle => "Navigation bar title",
            ContextTag::Unknown => "Text",
        }
    }

    pub fn comment_for(request: &CommentRequest) -> String {
        let describe = Self::describe(request.context);
        if request.file.is_empty() {
            describe.to_string()
        } else {
            format!("{} in {}", describe, request.file)
        }
    }
}

impl CommentGenerator for TemplateGenerator {
    fn generate(&self, request: CommentRequest) -> GenerateFuture<'_> {
        let comment = Self::comment_for(&request);
        Box::pin(async move { Ok(comment) })
    }
}
