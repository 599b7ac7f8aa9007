//! CLI layer: argument parsing, script execution and command dispatch

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod script;

pub use args::{Cli, Commands};
pub use error::{CliError, CliResult};
pub use commands::{run_script, Report};
pub use script::{parse_script, Outcome, ScriptCommand, ScriptLine, ScriptRunner};
