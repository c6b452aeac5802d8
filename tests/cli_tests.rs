use std::path::Path;
use std::process::{Command, Output};
use std::str;
use tempfile::TempDir;

/// Run the binary in an isolated home and working directory
fn iamctl(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_iamctl"))
        .args(args)
        .current_dir(home)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> &str {
    str::from_utf8(&output.stdout).expect("Invalid UTF-8")
}

fn stderr(output: &Output) -> &str {
    str::from_utf8(&output.stderr).expect("Invalid UTF-8")
}

/// CLI interface tests
#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn test_cli_help() {
        let home = TempDir::new().unwrap();
        let output = iamctl(home.path(), &["--help"]);
        let text = stdout(&output);

        assert!(output.status.success());
        assert!(text.contains("Usage:"));
        assert!(text.contains("Commands:"));
        assert!(text.contains("operations"));
        assert!(text.contains("get-role"));
        assert!(text.contains("delete-access-key"));
        assert!(text.contains("config"));
    }

    #[test]
    fn test_cli_version() {
        let home = TempDir::new().unwrap();
        let output = iamctl(home.path(), &["-q", "version"]);

        assert!(output.status.success());
        assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_operation_help_lists_parameters() {
        let home = TempDir::new().unwrap();
        let output = iamctl(home.path(), &["create-role", "--help"]);
        let text = stdout(&output);

        assert!(output.status.success());
        assert!(text.contains("--role-name"));
        assert!(text.contains("--assume-role-policy-document"));
        assert!(text.contains("--select"));
        assert!(text.contains("--force"));
        assert!(text.contains("--what-if"));
    }

    #[test]
    fn test_cmdlet_alias() {
        let home = TempDir::new().unwrap();
        let output = iamctl(home.path(), &["Get-IAMRole", "--help"]);

        assert!(output.status.success());
        assert!(stdout(&output).contains("--role-name"));
    }

    #[test]
    fn test_operations_filtered_by_verb() {
        let home = TempDir::new().unwrap();
        let output = iamctl(home.path(), &["-q", "operations", "--verb", "Remove"]);
        let text = stdout(&output);

        assert!(output.status.success());
        assert!(text.contains("delete-role"));
        assert!(text.contains("delete-saml-provider"));
        assert!(!text.contains("get-role"));
    }

    #[test]
    fn test_describe_as_json() {
        let home = TempDir::new().unwrap();
        let output = iamctl(home.path(), &["-q", "-o", "json", "describe", "Get-IAMRole"]);

        assert!(output.status.success());
        let info: serde_json::Value = serde_json::from_str(stdout(&output)).unwrap();
        assert_eq!(info["operation"], "GetRole");
        assert_eq!(info["default_select"], "Role");
        assert_eq!(info["parameters"][0]["required"], true);
    }

    #[test]
    fn test_describe_unknown_operation_fails() {
        let home = TempDir::new().unwrap();
        let output = iamctl(home.path(), &["-q", "describe", "launch-rockets"]);

        assert!(!output.status.success());
        assert!(stderr(&output).contains("Unknown operation"));
    }

    #[test]
    fn test_invalid_command() {
        let home = TempDir::new().unwrap();
        let output = iamctl(home.path(), &["invalid-command"]);

        assert!(!output.status.success());
        assert!(stderr(&output).contains("error:"));
    }

    #[test]
    fn test_missing_required_parameter() {
        let home = TempDir::new().unwrap();
        let output = iamctl(home.path(), &["-q", "get-role"]);

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("Missing required parameter(s) for GetRole"));
        assert!(stderr(&output).contains("--role-name"));
    }

    #[test]
    fn test_pattern_violation() {
        let home = TempDir::new().unwrap();
        let output = iamctl(home.path(), &["-q", "get-role", "--role-name", "bad name!"]);

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("Validation error"));
    }

    #[test]
    fn test_invalid_selector() {
        let home = TempDir::new().unwrap();
        let output = iamctl(
            home.path(),
            &["-q", "get-role", "--role-name", "deploy", "--select", "Nope"],
        );

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("Invalid selector 'Nope'"));
    }

    #[test]
    fn test_invalid_input_json() {
        let home = TempDir::new().unwrap();
        let output = iamctl(home.path(), &["-q", "list-roles", "--cli-input-json", "[1, 2]"]);

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("--cli-input-json"));
    }

    #[test]
    fn test_what_if_does_not_call_the_service() {
        let home = TempDir::new().unwrap();
        let output = iamctl(
            home.path(),
            &[
                "-q",
                "delete-role",
                "--role-name",
                "old-role",
                "--what-if",
                "--endpoint-url",
                "http://iamctl.invalid",
            ],
        );
        let text = stdout(&output);

        assert!(output.status.success(), "{}", stderr(&output));
        assert!(text.starts_with("What if:"));
        assert!(text.contains("Remove-IAMRole"));
        assert!(text.contains("old-role"));
    }

    #[test]
    fn test_confirmation_without_terminal_requires_force() {
        let home = TempDir::new().unwrap();
        let output = iamctl(
            home.path(),
            &["-q", "delete-user", "--user-name", "old-user"],
        );

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("--force"));
    }

    #[test]
    fn test_config_init_and_show() {
        let home = TempDir::new().unwrap();
        let project = home.path().to_str().unwrap();

        let output = iamctl(home.path(), &["-q", "config", "init", "--dir", project]);
        assert!(output.status.success(), "{}", stderr(&output));
        assert!(home.path().join(".iamctl").join("config.toml").exists());

        let output = iamctl(home.path(), &["-q", "-o", "json", "config", "show"]);
        assert!(output.status.success());
        let config: serde_json::Value = serde_json::from_str(stdout(&output)).unwrap();
        assert_eq!(config["client"]["timeout_ms"], 30000);

        let output = iamctl(home.path(), &["-q", "config", "validate"]);
        assert!(output.status.success());
        assert!(stdout(&output).contains("is valid"));
    }

    #[test]
    fn test_broken_config_file_fails() {
        let home = TempDir::new().unwrap();
        let path = home.path().join("broken.toml");
        std::fs::write(&path, "[client\n").unwrap();

        let output = iamctl(
            home.path(),
            &["-q", "--config", path.to_str().unwrap(), "version"],
        );

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("Configuration error"));
    }
}
