//! Fixture verification.
//!
//! Runs the pipeline on an input file with a deterministic generator and
//! requires the output to match the expected file byte for byte.

use thiserror::Error;

use crate::core::{
    comments::CommentBackend,
    pipeline::{FileError, Pipeline, PipelineOptions},
    source::SourceFile,
};

/// Path handed to the pipeline; only its stem can reach a comment.
const FIXTURE_PATH: &str = "Fixture.swift";

#[derive(Debug, Error)]
pub enum FixtureMismatch {
    #[error("pipeline failed: {0}")]
    Pipeline(#[from] FileError),
    #[error("line {line} differs\n  expected: {expected:?}\n    actual: {actual:?}")]
    Line {
        /// 1-based.
        line: usize,
        expected: String,
        actual: String,
    },
    /// Same lines, different bytes (line endings or a trailing newline).
    #[error("output differs from expected in line endings or trailing newline")]
    LineEndings,
}

/// Run the default pipeline with `generator` and compare against `expected`.
pub fn verify_fixture(
    input: &str,
    expected: &str,
    generator: CommentBackend,
) -> Result<(), FixtureMismatch> {
    let pipeline = Pipeline::new(PipelineOptions::default(), generator);
    verify_with(&pipeline, input, expected)
}

pub fn verify_with(pipeline: &Pipeline, input: &str, expected: &str) -> Result<(), FixtureMismatch> {
    let outcome = pipeline.process(&SourceFile::new(FIXTURE_PATH, input))?;
    compare(expected, &outcome.rewritten)
}

fn compare(expected: &str, actual: &str) -> Result<(), FixtureMismatch> {
    if expected == actual {
        return Ok(());
    }

    let mut expected_lines = expected.lines();
    let mut actual_lines = actual.lines();
    let mut line = 0;
    loop {
        line += 1;
        match (expected_lines.next(), actual_lines.next()) {
            (None, None) => return Err(FixtureMismatch::LineEndings),
            (e, a) if e == a => continue,
            (e, a) => {
                return Err(FixtureMismatch::Line {
                    line,
                    expected: e.unwrap_or("<end of file>").to_string(),
                    actual: a.unwrap_or("<end of file>").to_string(),
                });
            }
        }
    }
}
