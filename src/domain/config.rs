use serde::{Deserialize, Serialize};

/// iamctl configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IamCtlConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
    /// Service client configuration
    #[serde(default)]
    pub client: ClientConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Default output format (text, json, table, csv)
    #[serde(default = "default_output")]
    pub output: String,
}

/// Settings handed to the IAM client when it is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// AWS region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Shared config profile name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Custom endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Operation timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Partial global settings as found in one config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalOverrides {
    pub log_level: Option<String>,
    pub output: Option<String>,
}

/// Partial client settings as found in one config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientOverrides {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_output() -> String {
    "text".to_string()
}

fn default_timeout() -> u64 {
    30_000
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output: default_output(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            endpoint_url: None,
            timeout_ms: default_timeout(),
        }
    }
}

impl GlobalConfig {
    pub fn merge(&mut self, overrides: GlobalOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
    }
}

impl ClientConfig {
    /// Apply the set fields of `overrides` on top of this configuration
    pub fn merge(&mut self, overrides: ClientOverrides) {
        if overrides.region.is_some() {
            self.region = overrides.region;
        }
        if overrides.profile.is_some() {
            self.profile = overrides.profile;
        }
        if overrides.endpoint_url.is_some() {
            self.endpoint_url = overrides.endpoint_url;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = IamCtlConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: IamCtlConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.client, config.client);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: IamCtlConfig = toml::from_str(
            r#"
            [client]
            region = "eu-central-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.global.log_level, "info");
        assert_eq!(config.global.output, "text");
        assert_eq!(config.client.region.as_deref(), Some("eu-central-1"));
        assert_eq!(config.client.timeout_ms, 30_000);
    }

    #[test]
    fn test_merge_overrides_only_set_fields() {
        let mut client = ClientConfig {
            region: Some("us-east-1".to_string()),
            profile: Some("admin".to_string()),
            ..ClientConfig::default()
        };

        client.merge(ClientOverrides {
            region: Some("ap-south-1".to_string()),
            timeout_ms: Some(5000),
            ..ClientOverrides::default()
        });

        assert_eq!(client.region.as_deref(), Some("ap-south-1"));
        assert_eq!(client.profile.as_deref(), Some("admin"));
        assert_eq!(client.endpoint_url, None);
        assert_eq!(client.timeout_ms, 5000);
    }
}
