use std::process::ExitCode;

use anyhow::Result;

mod actions;
mod args;
mod commands;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, Command, WrapArgs, WrapMode};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let verbose = args.verbose();

    let result = run::run(args)?;
    report::print(&result, verbose);

    Ok(result.exit_status().into())
}
