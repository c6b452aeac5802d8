// Terminal implementation of the interaction host
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::host::InteractionHost;
use crate::domain::error::{IamCtlError, IamCtlResult};
use dialoguer::Confirm;
use serde_json::Value;
use std::error::Error as StdError;
use std::io::IsTerminal;

/// Prompts on the terminal and prints through a `ConsoleWriter`
pub struct ConsoleHost {
    writer: ConsoleWriter,
}

impl ConsoleHost {
    pub fn new(writer: ConsoleWriter) -> Self {
        Self { writer }
    }

    pub fn writer(&self) -> &ConsoleWriter {
        &self.writer
    }
}

impl InteractionHost for ConsoleHost {
    fn confirm(&self, message: &str) -> IamCtlResult<bool> {
        if !std::io::stdin().is_terminal() {
            return Err(IamCtlError::Prompt(
                "no terminal to prompt on; re-run with --force to skip confirmation".to_string(),
            ));
        }

        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|e| IamCtlError::Prompt(e.to_string()))
    }

    fn notice(&self, message: &str) -> IamCtlResult<()> {
        Ok(self.writer.write_message(message)?)
    }

    fn emit(&self, value: &Value) -> IamCtlResult<()> {
        Ok(self.writer.write_value(value)?)
    }

    fn emit_error(&self, error: &IamCtlError) {
        let _ = self.writer.write_error(&error_report(error));
    }
}

/// The error message followed by its cause chain
pub fn error_report(error: &IamCtlError) -> String {
    let mut report = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        report.push_str("\n  Caused by: ");
        report.push_str(&cause.to_string());
        source = cause.source();
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{ServiceError, TransportFailureKind};

    #[test]
    fn test_error_report_includes_causes() {
        let error = IamCtlError::NameResolution {
            message: "Name resolution failure attempting to reach the IAM endpoint".to_string(),
            source: ServiceError::transport(
                TransportFailureKind::NameResolution,
                "dns error: failed to lookup address information",
            ),
        };

        let report = error_report(&error);
        assert!(report.starts_with("Name resolution failure"));
        assert!(report.contains("Caused by: "));
        assert!(report.contains("failed to lookup address information"));
    }

    #[test]
    fn test_plain_errors_have_no_causes() {
        let report = error_report(&IamCtlError::Cancelled);
        assert_eq!(report, "Operation cancelled");
    }
}
