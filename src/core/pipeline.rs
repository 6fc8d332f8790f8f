//! One file, start to finish.
//!
//! ```text
//! text ─▶ scan ─▶ guard ─▶ classify ─▶ filter ─▶ comments ─▶ rewrite ─▶ text
//! ```
//!
//! Scanning, classification, and rewriting are sequential. Only the comment
//! calls run concurrently, bounded by a semaphore, each under a timeout.

use std::{collections::HashSet, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    core::{
        classify::{Classification, CodeView, Frame, classify},
        comments::{CommentBackend, CommentGenerator, CommentRequest, GeneratorError},
        guard::is_inert,
        registry::{ContextTag, Registry},
        rewrite::{
            BindingNames, EditOperation, Layout, LocalizationCall, RewriteError, Rewriter,
            WrapperSyntax, apply_edits,
        },
        scanner::{Lexeme, LiteralSpan, ScanError, scan},
        source::{LineIndex, SourceContext, SourceFile},
    },
    issues::{CommentFailureIssue, InterpolatedLiteralIssue, Issue},
    utils::contains_alphabetic,
};

pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_LINE_WIDTH: usize = 120;

/// Everything that shapes a run, resolved from config and flags.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub registry: Registry,
    pub wrapper: WrapperSyntax,
    pub layout: Layout,
    pub max_line_width: usize,
    /// Literal contents that are never wrapped.
    pub ignore_texts: HashSet<String>,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            registry: Registry::default(),
            wrapper: WrapperSyntax::default(),
            layout: Layout::default(),
            max_line_width: DEFAULT_MAX_LINE_WIDTH,
            ignore_texts: HashSet::new(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Why a literal was left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    /// Not in a registered UI position.
    pub unknown: usize,
    /// Already wrapped.
    pub wrapped: usize,
    /// Empty, no letters, or listed in `ignoreTexts`.
    pub filtered: usize,
    pub interpolated: usize,
    /// Comment generator failed or timed out.
    pub comment_failed: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.unknown + self.wrapped + self.filtered + self.interpolated + self.comment_failed
    }
}

impl std::ops::AddAssign for SkipCounts {
    fn add_assign(&mut self, other: Self) {
        self.unknown += other.unknown;
        self.wrapped += other.wrapped;
        self.filtered += other.filtered;
        self.interpolated += other.interpolated;
        self.comment_failed += other.comment_failed;
    }
}

/// One wrapped literal, for previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEdit {
    pub context: SourceContext,
    pub tag: ContextTag,
    /// The literal as written.
    pub literal: String,
    pub edits: Vec<EditOperation>,
}

impl PlannedEdit {
    pub fn is_hoisted(&self) -> bool {
        self.edits.iter().any(EditOperation::is_insertion)
    }
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: String,
    pub original: String,
    pub rewritten: String,
    pub planned: Vec<PlannedEdit>,
    pub skipped: SkipCounts,
    /// Literal-scoped warnings.
    pub issues: Vec<Issue>,
}

impl FileOutcome {
    pub fn changed(&self) -> bool {
        self.original != self.rewritten
    }
}

/// File-scoped failure. The file is left unchanged.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("{error}")]
    Scan {
        error: ScanError,
        context: SourceContext,
    },
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    #[error("failed to start comment runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// A literal that passed classification and filtering.
struct Candidate {
    span: LiteralSpan,
    frames: Vec<Frame>,
    classification: Classification,
}

pub struct Pipeline {
    options: PipelineOptions,
    generator: CommentBackend,
}

impl Pipeline {
    pub fn new(options: PipelineOptions, generator: CommentBackend) -> Self {
        Self { options, generator }
    }

    /// Wrap every accepted literal in `file`.
    pub fn process(&self, file: &SourceFile) -> Result<FileOutcome, FileError> {
        let text = file.text.as_str();
        let index = LineIndex::new(text);
        let lexemes = scan(text).map_err(|error| FileError::Scan {
            context: index.context(&file.path, error.offset()),
            error,
        })?;
        let view = CodeView::new(text, &lexemes);

        let mut skipped = SkipCounts::default();
        let mut issues = Vec::new();
        let mut candidates = Vec::new();

        let spans = lexemes.into_iter().filter_map(|lexeme| match lexeme {
            Lexeme::Literal(span) => Some(span),
            Lexeme::Comment(_) => None,
        });
        for span in spans {
            let frames = view.frames_at(span.start);
            if is_inert(&view, &frames, &self.options.wrapper) {
                skipped.wrapped += 1;
                continue;
            }
            let classification = classify(&view, &span, &frames, &self.options.registry);
            if classification.is_unknown() {
                skipped.unknown += 1;
                continue;
            }
            if span.contains_interpolation {
                skipped.interpolated += 1;
                issues.push(Issue::from(InterpolatedLiteralIssue {
                    context: index.context(&file.path, span.start),
                    text: span.raw.clone(),
                    tag: classification.tag,
                }));
                continue;
            }
            if !self.accepts_text(&span.raw) {
                skipped.filtered += 1;
                continue;
            }
            candidates.push(Candidate {
                span,
                frames,
                classification,
            });
        }

        let requests = candidates
            .iter()
            .map(|c| CommentRequest {
                text: c.span.raw.clone(),
                context: c.classification.tag,
                file: file.stem().to_string(),
            })
            .collect();
        let comments = self.generate_comments(requests)?;

        let mut rewriter = Rewriter::new(
            text,
            &self.options.wrapper,
            self.options.layout,
            self.options.max_line_width,
            BindingNames::new(view.identifiers()),
        );
        let mut planned = Vec::new();
        for (candidate, comment) in candidates.iter().zip(comments) {
            let tag = candidate.classification.tag;
            let comment = match comment {
                Ok(comment) => comment,
                Err(error) => {
                    skipped.comment_failed += 1;
                    issues.push(Issue::from(CommentFailureIssue {
                        context: index.context(&file.path, candidate.span.start),
                        text: candidate.span.raw.clone(),
                        tag,
                        error: error.to_string(),
                    }));
                    continue;
                }
            };
            let call = LocalizationCall {
                literal: candidate.span.source(text).to_string(),
                comment,
                tag,
            };
            let edits = rewriter.edits_for(
                &candidate.span,
                &candidate.frames,
                candidate.classification.emission,
                &call,
            );
            planned.push(PlannedEdit {
                context: index.context(&file.path, candidate.span.start),
                tag,
                literal: call.literal,
                edits,
            });
        }

        let all_edits: Vec<EditOperation> = planned
            .iter()
            .flat_map(|p| p.edits.iter().cloned())
            .collect();
        let rewritten = apply_edits(text, &all_edits)?;

        Ok(FileOutcome {
            path: file.path.clone(),
            original: file.text.clone(),
            rewritten,
            planned,
            skipped,
            issues,
        })
    }

    fn accepts_text(&self, raw: &str) -> bool {
        !raw.trim().is_empty()
            && contains_alphabetic(raw)
            && !self.options.ignore_texts.contains(raw)
    }

    /// One result per request, in request order.
    fn generate_comments(
        &self,
        requests: Vec<CommentRequest>,
    ) -> Result<Vec<Result<String, GeneratorError>>, FileError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(generate_bounded(
            &self.generator,
            requests,
            self.options.concurrency,
            self.options.timeout,
        )))
    }
}

/// Run one generator call per request, at most `concurrency` at a time,
/// each bounded by `timeout`. Results come back in request order.
async fn generate_bounded<G>(
    generator: &G,
    requests: Vec<CommentRequest>,
    concurrency: usize,
    timeout: Duration,
) -> Vec<Result<String, GeneratorError>>
where
    G: CommentGenerator + Clone + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let count = requests.len();

    let mut tasks = JoinSet::new();
    for (i, request) in requests.into_iter().enumerate() {
        let generator = generator.clone();
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let result = match tokio::time::timeout(timeout, generator.generate(request)).await {
                Ok(result) => result,
                Err(_) => Err(GeneratorError::Timeout {
                    millis: timeout.as_millis() as u64,
                }),
            };
            (i, result)
        });
    }

    let mut results: Vec<Option<Result<String, GeneratorError>>> = vec![None; count];
    while let Some(joined) = tasks.join_next().await {
        if let Ok((i, result)) = joined {
            results[i] = Some(result);
        }
    }
    results
        .into_iter()
        .map(|r| r.unwrap_or_else(|| Err(GeneratorError::backend("comment task panicked"))))
        .collect()
}
