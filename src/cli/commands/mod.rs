mod command_result;
pub mod init;
pub mod wrap;

pub use command_result::*;
