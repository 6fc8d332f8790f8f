//! Core wrapping engine.
//!
//! ```text
//! scanner ─▶ classify (code_view + registry) ─▶ guard ─▶ comments ─▶ rewrite
//! ```
//!
//! [`pipeline`] ties the stages together for one file. Nothing here touches
//! the filesystem except [`file_scanner`].

pub mod classify;
pub mod comments;
pub mod file_scanner;
pub mod guard;
pub mod harness;
pub mod pipeline;
pub mod registry;
pub mod rewrite;
pub mod scanner;
pub mod source;

pub use pipeline::{FileError, FileOutcome, Pipeline, PipelineOptions, PlannedEdit, SkipCounts};
pub use source::{SourceContext, SourceFile, SourceLocation};
