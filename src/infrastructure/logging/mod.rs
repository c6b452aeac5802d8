// Logging module - Logging infrastructure
use crate::domain::error::{IamCtlError, IamCtlResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(log_level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { log_level };
    format!("iamctl={},warn", level)
}

/// Initialize logging system
pub fn init_logging(log_level: &str, verbose: bool) -> IamCtlResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(log_level, verbose)))
        .map_err(|e| IamCtlError::Config {
            message: format!("Invalid log level '{}': {}", log_level, e),
        })?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true)
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .try_init()
        .map_err(|e| IamCtlError::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;

    tracing::debug!("iamctl logging system initialized");
    Ok(())
}
