// CLI module - Command line interface
pub mod args;
pub mod commands;
pub mod host;
pub mod output;

pub use args::{build_cli, parse_from, Cli, OutputFormat};
pub use commands::execute_command;
pub use host::ConsoleHost;
pub use output::{ConsoleWriter, OutputWriter};
