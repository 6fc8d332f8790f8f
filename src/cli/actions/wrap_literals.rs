//! WrapLiterals action.
//!
//! Writes the rewritten text of every changed file. Used by the default
//! `locwrap` run; `--dry-run` previews the same operations.

use super::{operation::Operation, traits::Action};
use crate::core::FileOutcome;

pub struct WrapLiterals;

impl Action<FileOutcome> for WrapLiterals {
    fn to_operations(outcomes: &[FileOutcome]) -> Vec<Operation> {
        outcomes
            .iter()
            .filter(|outcome| outcome.changed())
            .map(|outcome| Operation::WriteFile {
                path: outcome.path.clone(),
                content: outcome.rewritten.clone(),
                planned: outcome.planned.clone(),
            })
            .collect()
    }
}
