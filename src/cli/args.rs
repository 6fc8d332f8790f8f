//! CLI argument definitions using clap.
//!
//! Running `locwrap [PATHS]...` wraps literals in place; `init` writes a
//! default configuration file.

use clap::{Args, Parser, Subcommand};

use crate::{config::CommentSource, core::rewrite::Layout};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub wrap: WrapArgs,
}

impl Arguments {
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Init) => false,
            None => self.wrap.verbose,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct WrapArgs {
    /// Files or directories to process (default: `includes` from the config file)
    pub paths: Vec<String>,

    /// Print the planned edits without writing any file
    #[arg(long, conflicts_with = "check")]
    pub dry_run: bool,

    /// Exit with status 2 if any file would change, without writing
    #[arg(long)]
    pub check: bool,

    /// Where comments come from (overrides config file)
    #[arg(long, value_enum)]
    pub comment_source: Option<CommentSource>,

    /// Layout of the inserted calls: inline, expanded, or auto (overrides config file)
    #[arg(long)]
    pub layout: Option<Layout>,

    /// Write rewritten files under DIR, keeping their relative paths (overrides config file)
    #[arg(long, value_name = "DIR")]
    pub output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// What a wrap run does with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Apply,
    DryRun,
    Check,
}

impl WrapArgs {
    pub fn mode(&self) -> WrapMode {
        if self.check {
            WrapMode::Check
        } else if self.dry_run {
            WrapMode::DryRun
        } else {
            WrapMode::Apply
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize a new .locwraprc.json configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_arguments_are_consistent() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn test_parse_wrap_flags() {
        let args = Arguments::parse_from([
            "locwrap",
            "App",
            "Views/SettingsView.swift",
            "--dry-run",
            "--comment-source",
            "empty",
            "--layout",
            "expanded",
            "--output",
            "Localized",
        ]);
        assert!(args.command.is_none());
        assert_eq!(args.wrap.paths, vec!["App", "Views/SettingsView.swift"]);
        assert_eq!(args.wrap.mode(), WrapMode::DryRun);
        assert_eq!(args.wrap.comment_source, Some(CommentSource::Empty));
        assert_eq!(args.wrap.layout, Some(Layout::Expanded));
        assert_eq!(args.wrap.output.as_deref(), Some("Localized"));
    }

    #[test]
    fn test_parse_init() {
        let args = Arguments::parse_from(["locwrap", "init"]);
        assert!(matches!(args.command, Some(Command::Init)));
        assert!(!args.verbose());
    }

    #[test]
    fn test_dry_run_conflicts_with_check() {
        let result = Arguments::try_parse_from(["locwrap", "--dry-run", "--check"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_layout_is_rejected() {
        let result = Arguments::try_parse_from(["locwrap", "--layout", "wide"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_mode_is_apply() {
        let args = Arguments::parse_from(["locwrap", "-v"]);
        assert_eq!(args.wrap.mode(), WrapMode::Apply);
        assert!(args.verbose());
    }
}
