use super::super::{args::WrapMode, exit_status::ExitStatus};
use crate::{
    core::{FileOutcome, SkipCounts},
    issues::{Issue, Severity},
};

#[derive(Debug)]
pub enum CommandSummary {
    Wrap(WrapSummary),
    Init(InitSummary),
}

/// Counts for a whole run. Partial success is normal: some files may fail
/// while others are rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_checked: usize,
    pub wrapped: usize,
    pub hoisted: usize,
    pub skipped: SkipCounts,
    pub changed_files: usize,
    pub failed_files: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_checked += 1;
        self.wrapped += outcome.planned.len();
        self.hoisted += outcome.planned.iter().filter(|p| p.is_hoisted()).count();
        self.skipped += outcome.skipped;
        if outcome.changed() {
            self.changed_files += 1;
        }
    }

    pub fn record_failure(&mut self) {
        self.files_checked += 1;
        self.failed_files += 1;
    }
}

#[derive(Debug)]
pub struct WrapSummary {
    pub mode: WrapMode,
    pub run: RunSummary,
    /// Outcomes of files that changed (or would change).
    pub changed: Vec<FileOutcome>,
    /// Files actually written. Zero unless `mode` is `Apply`.
    pub written_files: usize,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running a locwrap command.
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// File failures and literal warnings.
    pub issues: Vec<Issue>,
}

impl CommandResult {
    pub fn new(summary: CommandSummary, issues: Vec<Issue>) -> Self {
        let error_count = issues
            .iter()
            .filter(|i| i.severity() == Severity::Error)
            .count();
        let warning_count = issues.len() - error_count;
        Self {
            summary,
            error_count,
            warning_count,
            issues,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        match &self.summary {
            CommandSummary::Init(_) => ExitStatus::Success,
            CommandSummary::Wrap(summary) => {
                if summary.run.failed_files > 0 || self.error_count > 0 {
                    ExitStatus::Failure
                } else if summary.mode == WrapMode::Check && summary.run.changed_files > 0 {
                    ExitStatus::PendingChanges
                } else {
                    ExitStatus::Success
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        core::{Pipeline, PipelineOptions, SourceFile, comments::FixedGenerator},
        issues::FileFailureIssue,
    };

    fn wrap_result(mode: WrapMode, run: RunSummary, issues: Vec<Issue>) -> CommandResult {
        CommandResult::new(
            CommandSummary::Wrap(WrapSummary {
                mode,
                run,
                changed: Vec::new(),
                written_files: 0,
            }),
            issues,
        )
    }

    #[test]
    fn test_exit_status() {
        let pending = RunSummary {
            files_checked: 2,
            changed_files: 1,
            ..Default::default()
        };
        assert_eq!(
            wrap_result(WrapMode::Apply, pending, vec![]).exit_status(),
            ExitStatus::Success
        );
        assert_eq!(
            wrap_result(WrapMode::Check, pending, vec![]).exit_status(),
            ExitStatus::PendingChanges
        );

        let failed = RunSummary {
            failed_files: 1,
            ..pending
        };
        let issue = Issue::from(FileFailureIssue {
            file_path: "Gone.swift".into(),
            message: "does not exist".into(),
        });
        let result = wrap_result(WrapMode::Check, failed, vec![issue]);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.exit_status(), ExitStatus::Failure);
    }

    #[test]
    fn test_run_summary_records_outcomes() {
        let pipeline = Pipeline::new(
            PipelineOptions::default(),
            FixedGenerator::default().with_default("C").into(),
        );
        let text = "Form {\n    Section(header: Text(\"About\")) {\n        Text(\"Body\")\n    }\n}\n";
        let changed = pipeline.process(&SourceFile::new("A.swift", text)).unwrap();
        let unchanged = pipeline
            .process(&SourceFile::new("B.swift", "Image(\"logo\")\n"))
            .unwrap();

        let mut run = RunSummary::default();
        run.record(&changed);
        run.record(&unchanged);
        run.record_failure();

        assert_eq!(run.files_checked, 3);
        assert_eq!(run.wrapped, 2);
        assert_eq!(run.hoisted, 1);
        assert_eq!(run.skipped.unknown, 1);
        assert_eq!(run.changed_files, 1);
        assert_eq!(run.failed_files, 1);
    }
}
