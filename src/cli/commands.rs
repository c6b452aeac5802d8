use crate::cli::args::{
    force_flag, input_json_arg, named_parameters, selector_arg, what_if_flag, Cli, Command,
    ConfigArgs, ConfigCommand, GlobalArgs, OutputFormat, ParsedCommand,
};
use crate::cli::host::ConsoleHost;
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::binder::merge_parameters;
use crate::core::catalog::{Catalog, OperationDescriptor, Verb};
use crate::core::confirm::ConfirmationOptions;
use crate::core::host::InteractionHost;
use crate::core::invocation::{InvocationContext, Invoker};
use crate::domain::config::{ClientOverrides, IamCtlConfig};
use crate::domain::error::{IamCtlError, IamCtlResult};
use crate::infrastructure::aws::SdkIamService;
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use clap::{ArgMatches, ValueEnum};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Execute CLI command. Every failure is reported through the console host
/// before it is returned.
pub async fn execute_command(
    cli: Cli,
    catalog: Catalog,
    cancel: CancellationToken,
) -> IamCtlResult<()> {
    let loaded = load_config(&cli.global);
    let format = resolve_format(&cli.global, loaded.as_ref().ok().map(|(_, config)| config));
    let host = ConsoleHost::new(ConsoleWriter::new(format));

    let result = match loaded {
        Ok((config_manager, config)) => {
            run_command(cli, catalog, &config_manager, &config, &host, cancel).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        host.emit_error(e);
    }
    result
}

async fn run_command(
    cli: Cli,
    catalog: Catalog,
    config_manager: &ConfigManager,
    config: &IamCtlConfig,
    host: &ConsoleHost,
    cancel: CancellationToken,
) -> IamCtlResult<()> {
    if !cli.global.quiet {
        init_logging(&config.global.log_level, cli.global.verbose)?;
    }

    match cli.command {
        ParsedCommand::Operation { operation, matches } => {
            execute_operation(operation, &matches, &cli.global, config, host, cancel).await
        }
        ParsedCommand::Builtin(Command::Operations { verb }) => {
            execute_operations_command(&catalog, verb.as_deref(), host.writer())
        }
        ParsedCommand::Builtin(Command::Describe { name }) => {
            let operation = catalog
                .find(&name)
                .ok_or_else(|| IamCtlError::UnknownOperation(name.clone()))?;
            host.writer().write_operation_detail(operation)?;
            Ok(())
        }
        ParsedCommand::Builtin(Command::Config(config_args)) => {
            execute_config_command(config_args, host.writer(), config, config_manager)
        }
        ParsedCommand::Builtin(Command::Version) => {
            host.writer()
                .write_message(&format!("iamctl {}", env!("CARGO_PKG_VERSION")))?;
            Ok(())
        }
    }
}

async fn execute_operation(
    operation: &'static OperationDescriptor,
    matches: &ArgMatches,
    global: &GlobalArgs,
    config: &IamCtlConfig,
    host: &ConsoleHost,
    cancel: CancellationToken,
) -> IamCtlResult<()> {
    let raw = merge_parameters(input_json_arg(matches), named_parameters(operation, matches))?;
    let context = InvocationContext::bind(operation, raw, selector_arg(matches), cancel)?;
    let options = ConfirmationOptions {
        force: force_flag(matches),
        what_if: what_if_flag(matches),
    };

    let mut client = config.client.clone();
    client.merge(client_overrides(global));
    debug!(
        operation = operation.operation,
        region = ?client.region,
        endpoint = ?client.endpoint_url,
        "invoking operation"
    );

    let service = SdkIamService::new(client);
    Invoker::new(&service, host)
        .run(context, options)
        .await
        .emit_to(host)
}

fn execute_operations_command(
    catalog: &Catalog,
    verb: Option<&str>,
    writer: &ConsoleWriter,
) -> IamCtlResult<()> {
    let operations: Vec<&OperationDescriptor> = match verb {
        Some(name) => {
            let verb = Verb::parse(name).ok_or_else(|| {
                let known: Vec<&str> = Verb::ALL.iter().map(|verb| verb.as_str()).collect();
                IamCtlError::validation(format!(
                    "Unknown verb '{}'; expected one of {}",
                    name,
                    known.join(", ")
                ))
            })?;
            catalog.with_verb(verb).collect()
        }
        None => catalog.iter().collect(),
    };

    writer.write_operations(&operations)?;
    Ok(())
}

fn execute_config_command(
    args: ConfigArgs,
    writer: &ConsoleWriter,
    config: &IamCtlConfig,
    config_manager: &ConfigManager,
) -> IamCtlResult<()> {
    match args.command {
        ConfigCommand::Show => {
            writer.write_config(config)?;
            Ok(())
        }
        ConfigCommand::Validate { file } => {
            let paths: Vec<PathBuf> = match file {
                Some(path) => vec![PathBuf::from(path)],
                None => [
                    config_manager.get_global_config_path_ref(),
                    config_manager.get_project_config_path(),
                ]
                .into_iter()
                .flatten()
                .filter(|path| path.exists())
                .cloned()
                .collect(),
            };

            if paths.is_empty() {
                writer.write_message("No configuration files found; using defaults")?;
                return Ok(());
            }

            for path in paths {
                validate_config_file(config_manager, &path, writer)?;
            }
            Ok(())
        }
        ConfigCommand::Init { dir } => {
            let directory = match dir {
                Some(path) => PathBuf::from(path),
                None => std::env::current_dir().map_err(|e| IamCtlError::Config {
                    message: format!("Failed to get current directory: {}", e),
                })?,
            };
            let created = config_manager.init_project_config(&directory)?;
            writer.write_message(&format!(
                "Project configuration initialized at '{}'",
                created.display()
            ))?;
            Ok(())
        }
    }
}

fn validate_config_file(
    config_manager: &ConfigManager,
    path: &Path,
    writer: &ConsoleWriter,
) -> IamCtlResult<()> {
    let warnings = config_manager.validate_file(path)?;
    if warnings.is_empty() {
        writer.write_message(&format!("Configuration file '{}' is valid", path.display()))?;
    } else {
        for warning in &warnings {
            writer.write_message(&format!("{}: warning: {}", path.display(), warning))?;
        }
    }
    Ok(())
}

fn load_config(global: &GlobalArgs) -> IamCtlResult<(ConfigManager, IamCtlConfig)> {
    let config_manager = ConfigManager::new()?;
    let config = match &global.config {
        Some(path) => config_manager.load_config_from_path(path.as_ref())?,
        None => config_manager.load_config()?,
    };
    Ok((config_manager, config))
}

/// `--output` wins, then the configured format, then text
fn resolve_format(global: &GlobalArgs, config: Option<&IamCtlConfig>) -> OutputFormat {
    global
        .output
        .or_else(|| config.and_then(|config| OutputFormat::from_str(&config.global.output, true).ok()))
        .unwrap_or_default()
}

fn client_overrides(global: &GlobalArgs) -> ClientOverrides {
    ClientOverrides {
        region: global.region.clone(),
        profile: global.profile.clone(),
        endpoint_url: global.endpoint_url.clone(),
        timeout_ms: None,
    }
}
