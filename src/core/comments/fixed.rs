use std::{collections::HashMap, sync::Arc};

use super::{CommentGenerator, CommentRequest, GenerateFuture, GeneratorError};

/// Comments looked up by literal text. Used by fixtures and tests.
///
/// A literal missing from the map gets `default` if one is set, and is a
/// backend failure otherwise.
#[derive(Debug, Clone, Default)]
pub struct FixedGenerator {
    comments: Arc<HashMap<String, String>>,
    default: Option<String>,
}

impl FixedGenerator {
    pub fn new(comments: HashMap<String, String>) -> Self {
        Self {
            comments: Arc::new(comments),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

impl CommentGenerator for FixedGenerator {
    fn generate(&self, request: CommentRequest) -> GenerateFuture<'_> {
        let result = self
            .comments
            .get(&request.text)
            .or(self.default.as_ref())
            .cloned()
            .ok_or_else(|| GeneratorError::backend(format!("no comment for \"{}\"", request.text)));
        Box::pin(async move { result })
    }
}
