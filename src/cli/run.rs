use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, init::init, wrap::wrap},
};

/// Dispatch to the command handler.
///
/// # Returns
/// - `Ok(CommandResult)` with the issues and counts of the run
/// - `Err` if the run could not start (bad config, existing config on `init`)
pub fn run(Arguments { command, wrap: args }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Init) => init(),
        None => wrap(args),
    }
}
