//! Low-level file operations.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, Result};
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::core::PlannedEdit;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Replace a file's contents with its rewritten text.
    WriteFile {
        path: String,
        content: String,
        planned: Vec<PlannedEdit>,
    },
}

impl Operation {
    pub fn path(&self) -> &str {
        match self {
            Operation::WriteFile { path, .. } => path,
        }
    }

    /// Literals wrapped by this operation.
    pub fn change_count(&self) -> usize {
        match self {
            Operation::WriteFile { planned, .. } => planned.len(),
        }
    }

    pub fn execute(&self) -> Result<()> {
        match self {
            Operation::WriteFile { path, content, .. } => {
                if let Some(parent) = Path::new(path).parent()
                    && !parent.as_os_str().is_empty()
                {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
                }
                fs::write(path, content).with_context(|| format!("Failed to write file: {}", path))
            }
        }
    }

    pub fn preview(&self) {
        self.preview_to(&mut io::stdout().lock());
    }

    pub fn preview_to<W: Write>(&self, writer: &mut W) {
        match self {
            Operation::WriteFile { planned, .. } => {
                for edit in planned {
                    preview_edit(edit, writer);
                }
            }
        }
    }
}

fn preview_edit<W: Write>(edit: &PlannedEdit, writer: &mut W) {
    let ctx = &edit.context;
    let source_line = &ctx.source_line;

    // Clickable location: --> path:line:col
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}  {}",
        "-->".blue(),
        ctx.file_path(),
        ctx.line(),
        ctx.col(),
        format!("[{}]", edit.tag).dimmed().cyan()
    );
    let _ = writeln!(writer, "     {}", "|".blue());
    let _ = writeln!(
        writer,
        " {:>3} {} {}",
        ctx.line().to_string().blue(),
        "|".blue(),
        source_line
    );

    let prefix: String = source_line.chars().take(ctx.col().saturating_sub(1)).collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "     {} {:>padding$}{}",
        "|".blue(),
        "",
        "^".green(),
        padding = caret_padding
    );

    for line in preview_lines(edit) {
        let _ = writeln!(writer, "  {} {}", "+".green().bold(), line.green());
    }
    let _ = writeln!(writer);
}

/// The lines an edit produces, as they will read in the file.
///
/// Inserted bindings come first. A replacement is shown in place on its
/// source line when the literal sits on that line; otherwise the
/// replacement text is shown alone.
fn preview_lines(edit: &PlannedEdit) -> Vec<String> {
    let source_line = edit.context.source_line.as_str();
    let col_byte = source_line
        .char_indices()
        .nth(edit.context.col().saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(source_line.len());

    let mut lines = Vec::new();
    for op in &edit.edits {
        if op.is_insertion() {
            lines.extend(op.replacement.lines().map(str::to_string));
            continue;
        }
        let rest = &source_line[col_byte..];
        let shown = match rest.strip_prefix(edit.literal.as_str()) {
            Some(after) => format!("{}{}{}", &source_line[..col_byte], op.replacement, after),
            None => op.replacement.clone(),
        };
        lines.extend(shown.lines().map(str::to_string));
    }
    lines
}
