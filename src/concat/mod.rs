//! Final file assembly using an external concatenation tool.

mod command;
mod concatenator;

pub use command::{CommandOutput, CommandRunner, ExternalCommand, SystemRunner};
pub use concatenator::{ConcatError, Concatenator};
