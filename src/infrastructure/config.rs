use crate::domain::config::{ClientOverrides, GlobalOverrides, IamCtlConfig};
use crate::domain::error::{IamCtlError, IamCtlResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const PROJECT_DIR: &str = ".iamctl";
const CONFIG_FILE: &str = "config.toml";

const PROJECT_TEMPLATE: &str = r#"# iamctl project configuration
#
# Values under [client] override the global file (~/.config/iamctl/config.toml)
# and are themselves overridden by --region, --profile and --endpoint-url.

[global]
log_level = "info"
output = "text"

[client]
# region = "us-east-1"
# profile = "default"
# endpoint_url = "http://localhost:4566"
timeout_ms = 30000
"#;

/// A config file as written, every section optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    global: GlobalOverrides,
    #[serde(default)]
    client: ClientOverrides,
}

/// Configuration manager
pub struct ConfigManager {
    global_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> IamCtlResult<Self> {
        let global_config_path = Self::get_global_config_path()?;
        let project_config_path = Self::find_project_config_path();

        Ok(Self {
            global_config_path: Some(global_config_path),
            project_config_path,
        })
    }

    /// Manager over explicit file locations
    pub fn with_paths(global: Option<PathBuf>, project: Option<PathBuf>) -> Self {
        Self {
            global_config_path: global,
            project_config_path: project,
        }
    }

    /// Load configuration: defaults, then the global file, then the project file
    pub fn load_config(&self) -> IamCtlResult<IamCtlConfig> {
        let mut config = IamCtlConfig::default();

        for path in [&self.global_config_path, &self.project_config_path]
            .into_iter()
            .flatten()
        {
            if path.exists() {
                debug!(path = %path.display(), "loading config file");
                Self::apply_file(&mut config, Self::read_file(path)?);
            }
        }

        Ok(config)
    }

    /// Load exactly one file on top of the defaults
    pub fn load_config_from_path(&self, path: &Path) -> IamCtlResult<IamCtlConfig> {
        let mut config = IamCtlConfig::default();
        Self::apply_file(&mut config, Self::read_file(path)?);
        Ok(config)
    }

    fn apply_file(config: &mut IamCtlConfig, file: ConfigFile) {
        config.global.merge(file.global);
        config.client.merge(file.client);
    }

    fn read_file(path: &Path) -> IamCtlResult<ConfigFile> {
        let content = fs::read_to_string(path).map_err(|e| IamCtlError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| IamCtlError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Check that a file parses and holds sensible values
    pub fn validate_file(&self, path: &Path) -> IamCtlResult<Vec<String>> {
        let config = self.load_config_from_path(path)?;
        let mut warnings = Vec::new();

        if config.client.timeout_ms == 0 {
            warnings.push("client.timeout_ms is 0; every call will time out".to_string());
        }
        if let Some(url) = &config.client.endpoint_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                warnings.push(format!("client.endpoint_url '{}' is not an http(s) URL", url));
            }
        }
        if !["text", "json", "table", "csv"].contains(&config.global.output.as_str()) {
            warnings.push(format!(
                "global.output '{}' is not one of text, json, table, csv",
                config.global.output
            ));
        }

        Ok(warnings)
    }

    /// Get global configuration path
    fn get_global_config_path() -> IamCtlResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| IamCtlError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("iamctl").join(CONFIG_FILE))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(PROJECT_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Create default project configuration under `path`
    pub fn init_project_config(&self, path: &Path) -> IamCtlResult<PathBuf> {
        let config_dir = path.join(PROJECT_DIR);
        let config_file = config_dir.join(CONFIG_FILE);

        if config_file.exists() {
            return Err(IamCtlError::Config {
                message: format!(
                    "Project configuration already exists at {}",
                    config_file.display()
                ),
            });
        }

        fs::create_dir_all(&config_dir).map_err(|e| IamCtlError::Config {
            message: format!("Failed to create {} directory: {}", PROJECT_DIR, e),
        })?;

        fs::write(&config_file, PROJECT_TEMPLATE).map_err(|e| IamCtlError::Config {
            message: format!("Failed to write config file {}: {}", config_file.display(), e),
        })?;

        Ok(config_file)
    }

    /// Get the current project config path (if any)
    pub fn get_project_config_path(&self) -> Option<&PathBuf> {
        self.project_config_path.as_ref()
    }

    /// Get the global config path (if any)
    pub fn get_global_config_path_ref(&self) -> Option<&PathBuf> {
        self.global_config_path.as_ref()
    }
}
