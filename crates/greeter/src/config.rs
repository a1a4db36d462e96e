//! Configuration management for the greeter demo.
//!
//! This module handles loading and validation of the TOML configuration and
//! turns the plugin section into interception loaders for a load pass.

use scaffold::{AliasLoader, Loader, SkipLoader};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Log levels accepted by `logging.level`
const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Plugin configuration settings
    #[serde(default)]
    pub plugins: PluginSettings,
}

/// Logging system configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

/// Plugin loading configuration.
///
/// Controls which registered plugins a load pass skips and which plugin
/// names are resolved as other plugins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Plugin names that are never mounted
    #[serde(default)]
    pub skip: Vec<String>,
    /// Requested name -> plugin actually mounted
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl PluginSettings {
    /// Interception loaders for a load pass: skips first, then aliases.
    pub fn loaders(&self) -> Vec<Box<dyn Loader>> {
        let mut loaders: Vec<Box<dyn Loader>> = Vec::new();
        if !self.skip.is_empty() {
            loaders.push(Box::new(SkipLoader::new(self.skip.iter().cloned())));
        }
        if !self.aliases.is_empty() {
            loaders.push(Box::new(
                self.aliases
                    .iter()
                    .map(|(from, to)| (from.clone(), to.clone()))
                    .collect::<AliasLoader>(),
            ));
        }
        loaders
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file, creating a default file if none exists.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the TOML configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration, or the defaults just written to `path`.
    /// Read, write and TOML errors are returned as-is.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("📝 Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration settings.
    pub fn validate(&self) -> Result<(), String> {
        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {VALID_LEVELS:?}",
                &self.logging.level
            ));
        }

        for name in &self.plugins.skip {
            if name.is_empty() {
                return Err("plugins.skip cannot contain an empty name".to_string());
            }
            if self.plugins.aliases.contains_key(name) {
                return Err(format!("Plugin {name} is both skipped and aliased"));
            }
        }

        for (from, to) in &self.plugins.aliases {
            if to.is_empty() {
                return Err(format!("Alias for plugin {from} has an empty target"));
            }
        }

        Ok(())
    }
}
