//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format. Kept apart from the engine
//! so that locwrap can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::{
    actions::{Action, WrapLiterals},
    args::WrapMode,
    commands::{CommandResult, CommandSummary, InitSummary, RunSummary, WrapSummary},
};
use crate::{
    config::CONFIG_FILE_NAME,
    issues::{Issue, Report, ReportLocation, Severity},
    utils::plural,
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format, followed by a problem count.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort_by(compare_issues);

    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when there was nothing left to wrap.
pub fn print_success_to<W: Write>(files: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} {} - nothing to wrap",
            files,
            plural(files, "file", "files")
        )
        .green()
    );
}

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Wrap(summary) => print_wrap(result, summary, verbose),
        CommandSummary::Init(summary) => print_init(summary),
    }
}

fn print_wrap(result: &CommandResult, summary: &WrapSummary, verbose: bool) {
    let run = &summary.run;
    let stdout = &mut io::stdout().lock();

    match summary.mode {
        WrapMode::DryRun => WrapLiterals::preview(&summary.changed),
        WrapMode::Check => {
            for outcome in &summary.changed {
                let _ = writeln!(stdout, "{} {}", "would change:".yellow().bold(), outcome.path);
            }
        }
        WrapMode::Apply => {}
    }

    report_to(&result.issues, stdout);

    if run.changed_files == 0 {
        if result.error_count == 0 {
            print_success_to(run.files_checked, stdout);
        }
    } else {
        print_changes(summary, stdout);
    }

    if verbose {
        print_skipped_to(run, stdout);
    }
}

fn print_changes<W: Write>(summary: &WrapSummary, writer: &mut W) {
    let run = &summary.run;
    let literals = plural(run.wrapped, "literal", "literals");
    match summary.mode {
        WrapMode::Apply => {
            let _ = writeln!(
                writer,
                "{} {} {} in {} {}.",
                "Wrapped".green().bold(),
                run.wrapped,
                literals,
                summary.written_files,
                plural(summary.written_files, "file", "files")
            );
        }
        WrapMode::DryRun => {
            let _ = writeln!(
                writer,
                "{} {} {} in {} {}.",
                "Would wrap".yellow().bold(),
                run.wrapped,
                literals,
                run.changed_files,
                plural(run.changed_files, "file", "files")
            );
            let _ = writeln!(writer, "Run without {} to write these changes.", "--dry-run".cyan());
        }
        WrapMode::Check => {
            let _ = writeln!(
                writer,
                "{} {} {} would change ({} {} to wrap)",
                FAILURE_MARK.red(),
                run.changed_files,
                plural(run.changed_files, "file", "files"),
                run.wrapped,
                literals
            );
        }
    }
    if run.hoisted > 0 {
        let _ = writeln!(writer, "  - hoisted into bindings: {}", run.hoisted);
    }
}

fn print_skipped_to<W: Write>(run: &RunSummary, writer: &mut W) {
    let skipped = &run.skipped;
    if skipped.total() == 0 {
        return;
    }
    let _ = writeln!(writer, "Skipped {} literal(s):", skipped.total());
    let rows = [
        ("not a UI string", skipped.unknown),
        ("already wrapped", skipped.wrapped),
        ("empty, no letters, or ignored", skipped.filtered),
        ("interpolated", skipped.interpolated),
        ("comment unavailable", skipped.comment_failed),
    ];
    for (label, count) in rows {
        if count > 0 {
            let _ = writeln!(writer, "  - {}: {}", label, count);
        }
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();
    let (file_path, line, col, source_line) = extract_location_info(&loc);

    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Clickable location: --> path:line:col
    match source_line {
        Some(_) => {
            let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
        }
        None => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), file_path);
        }
    }

    if let Some(source_line) = source_line {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // Caret pointing to the column (col is 1-based)
        let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} {} ({} {}, {} {})",
        FAILURE_MARK.red(),
        issues.len(),
        plural(issues.len(), "problem", "problems"),
        total_errors,
        plural(total_errors, "error", "errors").red(),
        total_warnings,
        plural(total_warnings, "warning", "warnings").yellow()
    );
}

fn extract_location_info<'a>(
    loc: &'a ReportLocation<'a>,
) -> (&'a str, usize, usize, Option<&'a str>) {
    match loc {
        ReportLocation::Source(ctx) => (
            ctx.file_path(),
            ctx.line(),
            ctx.col(),
            Some(&ctx.source_line),
        ),
        ReportLocation::File { path } => (path, 0, 0, None),
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn compare_issues(a: &Issue, b: &Issue) -> std::cmp::Ordering {
    let a_loc = a.location();
    let b_loc = b.location();
    let (a_path, a_line, a_col, _) = extract_location_info(&a_loc);
    let (b_path, b_line, b_col, _) = extract_location_info(&b_loc);

    a_path
        .cmp(b_path)
        .then_with(|| a_line.cmp(&b_line))
        .then_with(|| a_col.cmp(&b_col))
}

// ============================================================
// Tests
// ============================================================
