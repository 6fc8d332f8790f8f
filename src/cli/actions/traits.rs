//! Action trait definition.

use std::collections::HashSet;

use super::operation::Operation;
use crate::issues::{FileFailureIssue, Issue};

/// Statistics from running an action.
#[derive(Debug, Clone, Default)]
pub struct ActionStats {
    /// Number of operations processed.
    pub processed: usize,
    /// Number of literals wrapped in the files that were written.
    pub changes_applied: usize,
    /// Number of files written.
    pub files_modified: usize,
    /// Files that could not be written.
    pub failures: Vec<Issue>,
}

/// Converts items into [`Operation`]s and executes or previews them.
///
/// ```ignore
/// if mode == WrapMode::Apply {
///     let stats = WrapLiterals::run(&outcomes);
/// } else {
///     WrapLiterals::preview(&outcomes);
/// }
/// ```
pub trait Action<I> {
    /// Convert items to low-level operations.
    ///
    /// This is the only method that must be implemented.
    fn to_operations(items: &[I]) -> Vec<Operation>;

    /// Execute the action (modify files). A failed write is recorded and
    /// the remaining operations still run.
    fn run(items: &[I]) -> ActionStats {
        let ops = Self::to_operations(items);
        execute_operations(&ops)
    }

    /// Preview the action (dry-run mode).
    fn preview(items: &[I]) {
        let ops = Self::to_operations(items);
        for op in &ops {
            op.preview();
        }
    }
}

pub(crate) fn execute_operations(ops: &[Operation]) -> ActionStats {
    let mut stats = ActionStats {
        processed: ops.len(),
        ..Default::default()
    };
    let mut files_modified: HashSet<&str> = HashSet::new();

    for op in ops {
        match op.execute() {
            Ok(()) => {
                stats.changes_applied += op.change_count();
                files_modified.insert(op.path());
            }
            Err(err) => stats.failures.push(Issue::from(FileFailureIssue {
                file_path: op.path().to_string(),
                message: format!("{:#}", err),
            })),
        }
    }

    stats.files_modified = files_modified.len();
    stats
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_execute_continues_after_failure() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("Good.swift");
        // A regular file where a directory should be.
        let blocker = dir.path().join("Views");
        fs::write(&blocker, "").unwrap();
        let bad = blocker.join("Bad.swift");
        let ops = vec![
            Operation::WriteFile {
                path: bad.to_string_lossy().into_owned(),
                content: "x".into(),
                planned: Vec::new(),
            },
            Operation::WriteFile {
                path: good.to_string_lossy().into_owned(),
                content: "Text(String(localized: \"A\", comment: \"\"))".into(),
                planned: Vec::new(),
            },
        ];

        let stats = execute_operations(&ops);

        assert_eq!(stats.processed, 2);
        assert_eq!(stats.files_modified, 1);
        assert_eq!(stats.failures.len(), 1);
        assert!(fs::read_to_string(&good).unwrap().starts_with("Text(String("));
    }
}
