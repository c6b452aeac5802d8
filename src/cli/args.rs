use crate::core::binder::RawParameters;
use crate::core::catalog::{Catalog, OperationDescriptor};
use clap::{
    Arg, ArgAction, ArgMatches, Args as ClapArgs, CommandFactory, FromArgMatches, Parser,
    Subcommand, ValueEnum,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ffi::OsString;

const SELECT_ARG: &str = "select";
const INPUT_JSON_ARG: &str = "cli-input-json";
const FORCE_ARG: &str = "force";
const WHAT_IF_ARG: &str = "what-if";

/// Command line arguments for iamctl
#[derive(Parser, Debug)]
#[command(
    name = "iamctl",
    version = env!("CARGO_PKG_VERSION"),
    about = "Command-line wrappers for AWS IAM API operations",
    long_about = "Invoke AWS Identity and Access Management API operations as shell commands, with parameter validation, confirmation prompts for state-changing calls, and selectable output."
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// AWS region
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Shared config profile
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Custom IAM endpoint URL
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,
}

/// Built-in commands; IAM operations are added from the catalog
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the IAM operations iamctl can invoke
    Operations {
        /// Only list operations with this verb (Get, New, Remove, ...)
        #[arg(long)]
        verb: Option<String>,
    },
    /// Show the parameters and response members of an operation
    Describe {
        /// Command name, API operation name, or cmdlet alias
        name: String,
    },
    /// Configuration management commands
    Config(ConfigArgs),
    /// Display version information
    Version,
}

/// Configuration management arguments
#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate a configuration file
    Validate {
        /// Configuration file path
        file: Option<String>,
    },
    /// Create a project configuration
    Init {
        /// Directory to create .iamctl/config.toml in (defaults to the current one)
        #[arg(short, long)]
        dir: Option<String>,
    },
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
    /// CSV output
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// What the command line asked for
#[derive(Debug)]
pub enum ParsedCommand {
    Builtin(Command),
    Operation {
        operation: &'static OperationDescriptor,
        matches: ArgMatches,
    },
}

/// Parsed command line
#[derive(Debug)]
pub struct Cli {
    pub global: GlobalArgs,
    pub command: ParsedCommand,
}

/// The full command tree: built-in commands plus one subcommand per operation
pub fn build_cli(catalog: &Catalog) -> clap::Command {
    Args::command().subcommands(catalog.iter().map(operation_command))
}

/// Parse `args` (program name first) against the command tree
pub fn parse_from<I, T>(catalog: &Catalog, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli(catalog).try_get_matches_from(args)?;
    let global = GlobalArgs::from_arg_matches(&matches)?;

    if let Some((name, sub_matches)) = matches.subcommand() {
        if let Some(operation) = catalog.iter().find(|op| op.command_name() == name) {
            return Ok(Cli {
                global,
                command: ParsedCommand::Operation {
                    operation,
                    matches: sub_matches.clone(),
                },
            });
        }
    }

    let command = Command::from_arg_matches(&matches)?;
    Ok(Cli {
        global,
        command: ParsedCommand::Builtin(command),
    })
}

fn operation_command(operation: &'static OperationDescriptor) -> clap::Command {
    let mut command = clap::Command::new(operation.command_name())
        .about(operation.summary)
        .visible_alias(operation.cmdlet_name())
        .arg(
            Arg::new(SELECT_ARG)
                .long(SELECT_ARG)
                .value_name("EXPR")
                .help(format!(
                    "Output selector: '*', a response member ('Role.Arn'), or '^Parameter' [default: {}]",
                    operation.default_select
                )),
        )
        .arg(
            Arg::new(INPUT_JSON_ARG)
                .long(INPUT_JSON_ARG)
                .value_name("JSON")
                .help("JSON object of request parameters keyed by API name; named options win"),
        );

    for field in operation.fields {
        let required = if field.required { " [required]" } else { "" };
        command = command.arg(
            Arg::new(field.name)
                .long(field.flag_name())
                .value_name(field.name)
                .help(format!("{} ({}){}", field.help, field.kind, required)),
        );
    }

    if operation.is_state_changing() {
        command = command
            .arg(
                Arg::new(FORCE_ARG)
                    .long(FORCE_ARG)
                    .short('f')
                    .action(ArgAction::SetTrue)
                    .help("Skip the confirmation prompt"),
            )
            .arg(
                Arg::new(WHAT_IF_ARG)
                    .long(WHAT_IF_ARG)
                    .action(ArgAction::SetTrue)
                    .help("Show what would happen without calling the service"),
            );
    }

    command
}

/// Request fields given as named options
pub fn named_parameters(operation: &OperationDescriptor, matches: &ArgMatches) -> RawParameters {
    let mut parameters = RawParameters::new();
    for field in operation.fields {
        if let Some(value) = matches.get_one::<String>(field.name) {
            parameters.insert(field.name.to_string(), Value::String(value.clone()));
        }
    }
    parameters
}

pub fn selector_arg(matches: &ArgMatches) -> Option<&str> {
    matches.get_one::<String>(SELECT_ARG).map(String::as_str)
}

pub fn input_json_arg(matches: &ArgMatches) -> Option<&str> {
    matches.get_one::<String>(INPUT_JSON_ARG).map(String::as_str)
}

pub fn force_flag(matches: &ArgMatches) -> bool {
    flag(matches, FORCE_ARG)
}

pub fn what_if_flag(matches: &ArgMatches) -> bool {
    flag(matches, WHAT_IF_ARG)
}

// Read-only operations do not define the confirmation flags
fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches
        .try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}
