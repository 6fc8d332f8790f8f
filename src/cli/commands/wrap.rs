//! Wrap command - the default `locwrap [PATHS]...` run.
//!
//! Discovers Swift files, runs the pipeline on each file in parallel, then
//! writes, previews, or only checks the result depending on the mode.
//! A failing file never stops the others.

use std::{env, fs};

use anyhow::{Context, Result};
use colored::Colorize;
use rayon::prelude::*;

use super::{CommandResult, CommandSummary, RunSummary, WrapSummary};
use crate::{
    cli::{
        actions::{Action, WrapLiterals},
        args::{WrapArgs, WrapMode},
    },
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        FileError, FileOutcome, Pipeline, SourceFile,
        file_scanner::{common_root, output_path, scan_files},
    },
    issues::{FileFailureIssue, Issue, RewriteConflictIssue, ScanFailureIssue},
};

pub fn wrap(args: WrapArgs) -> Result<CommandResult> {
    let cwd = env::current_dir().context("Failed to read the current directory")?;
    let loaded = load_config(&cwd)?;
    if args.verbose && !loaded.from_file {
        eprintln!(
            "{} no {} found, using defaults",
            "note:".bold(),
            CONFIG_FILE_NAME
        );
    }
    let config = apply_overrides(loaded.config, &args);
    config.validate()?;

    let includes = if args.paths.is_empty() {
        config.includes.clone()
    } else {
        args.paths.clone()
    };
    let scan = scan_files(".", &includes, &config.ignores, &config.extensions, args.verbose);

    let pipeline = Pipeline::new(config.pipeline_options(), config.comment_backend()?);
    let results: Vec<Result<FileOutcome, Issue>> = scan
        .files
        .par_iter()
        .map(|path| process_file(&pipeline, path))
        .collect();

    let mut run = RunSummary::default();
    let mut issues: Vec<Issue> = Vec::new();
    let mut changed: Vec<FileOutcome> = Vec::new();

    for path in &scan.missing {
        run.record_failure();
        issues.push(Issue::from(FileFailureIssue {
            file_path: path.clone(),
            message: "path does not exist".to_string(),
        }));
    }

    for result in results {
        match result {
            Ok(mut outcome) => {
                run.record(&outcome);
                issues.append(&mut outcome.issues);
                if outcome.changed() {
                    changed.push(outcome);
                }
            }
            Err(issue) => {
                if args.verbose {
                    eprintln!("{} {}", "skipped:".bold().yellow(), issue_path(&issue));
                }
                run.record_failure();
                issues.push(issue);
            }
        }
    }

    let mode = args.mode();
    let mut written_files = 0;
    if mode == WrapMode::Apply && !changed.is_empty() {
        if let Some(output) = &config.output {
            redirect_output(&mut changed, &includes, output);
        }
        let stats = WrapLiterals::run(&changed);
        written_files = stats.files_modified;
        // A failed write turns a changed file into a failed one.
        run.changed_files -= stats.failures.len();
        run.failed_files += stats.failures.len();
        issues.extend(stats.failures);
    }

    Ok(CommandResult::new(
        CommandSummary::Wrap(WrapSummary {
            mode,
            run,
            changed,
            written_files,
        }),
        issues,
    ))
}

/// CLI flags take precedence over the config file.
fn apply_overrides(mut config: Config, args: &WrapArgs) -> Config {
    if let Some(source) = args.comment_source {
        config.comment_source = source;
    }
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    config
}

/// Points each outcome at its place under `output`, mirroring the layout
/// below the includes' common root.
fn redirect_output(outcomes: &mut [FileOutcome], includes: &[String], output: &str) {
    let root = common_root(includes);
    for outcome in outcomes {
        outcome.path = output_path(&outcome.path, &root, output)
            .to_string_lossy()
            .into_owned();
    }
}

fn process_file(pipeline: &Pipeline, path: &str) -> Result<FileOutcome, Issue> {
    let text = fs::read_to_string(path).map_err(|err| {
        Issue::from(FileFailureIssue {
            file_path: path.to_string(),
            message: format!("failed to read file: {}", err),
        })
    })?;

    pipeline
        .process(&SourceFile::new(path, text))
        .map_err(|err| match err {
            FileError::Scan { error, context } => Issue::from(ScanFailureIssue {
                context,
                message: error.to_string(),
            }),
            FileError::Rewrite(error) => Issue::from(RewriteConflictIssue {
                file_path: path.to_string(),
                message: error.to_string(),
            }),
            err @ FileError::Runtime(_) => Issue::from(FileFailureIssue {
                file_path: path.to_string(),
                message: err.to_string(),
            }),
        })
}

fn issue_path(issue: &Issue) -> &str {
    match issue {
        Issue::ScanFailure(i) => i.context.file_path(),
        Issue::RewriteConflict(i) => &i.file_path,
        Issue::FileFailure(i) => &i.file_path,
        Issue::CommentFailure(i) => i.context.file_path(),
        Issue::InterpolatedLiteral(i) => i.context.file_path(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{config::CommentSource, core::rewrite::Layout};

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            comment_source: CommentSource::Command,
            layout: Layout::Expanded,
            ..Default::default()
        };
        let args = WrapArgs {
            comment_source: Some(CommentSource::Empty),
            ..Default::default()
        };
        let config = apply_overrides(config, &args);
        assert_eq!(config.comment_source, CommentSource::Empty);
        assert_eq!(config.layout, Layout::Expanded);
        assert_eq!(config.output, None);
    }

    #[test]
    fn test_output_flag_overrides_config() {
        let config = Config {
            output: Some("FromConfig".to_string()),
            ..Default::default()
        };
        let args = WrapArgs {
            output: Some("FromFlag".to_string()),
            ..Default::default()
        };
        assert_eq!(apply_overrides(config, &args).output.as_deref(), Some("FromFlag"));
    }

    #[test]
    fn test_redirect_output_keeps_paths_below_root() {
        let pipeline = Pipeline::new(
            Config::default().pipeline_options(),
            Config::default().comment_backend().unwrap(),
        );
        let mut outcomes = vec![
            pipeline
                .process(&SourceFile::new("App/Views/A.swift", "Text(\"Hi\")\n"))
                .unwrap(),
        ];
        redirect_output(&mut outcomes, &[".".to_string()], "out");
        assert_eq!(outcomes[0].path, "out/App/Views/A.swift");
    }

    #[test]
    fn test_unreadable_file_is_a_file_failure() {
        let pipeline = Pipeline::new(
            Config::default().pipeline_options(),
            Config::default().comment_backend().unwrap(),
        );
        let issue = process_file(&pipeline, "does/not/exist.swift").unwrap_err();
        assert!(issue.is_file_failure());
        assert_eq!(issue_path(&issue), "does/not/exist.swift");
    }
}
