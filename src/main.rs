use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use locwrap::cli::{Arguments, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse();

    match locwrap::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".bold().red(), err);
            ExitStatus::Failure.into()
        }
    }
}
