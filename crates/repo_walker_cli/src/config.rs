//! Configuration management for the repo-walker CLI.
//!
//! The configuration is stored in TOML format and is optional: when no file is
//! named on the command line and the default file does not exist, built-in
//! defaults are used.

use std::{env, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "repo-walker.toml";

/// Environment variable holding the GitHub token unless configured otherwise
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the repo-walker CLI.
///
/// # Example TOML Configuration
///
/// ```toml
/// [github]
/// api_url = "https://api.github.com"
/// token_env = "GITHUB_TOKEN"
/// per_page = 100
///
/// [logging]
/// debug = false
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the GitHub API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Base URL of the REST API, e.g. for GitHub Enterprise Server.
    pub api_url: String,

    /// Name of the environment variable holding a personal access token.
    ///
    /// Requests are sent anonymously when the variable is not set.
    pub token_env: String,

    /// Page size requested by list commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u8>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: github_api::DEFAULT_API_URL.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            per_page: None,
        }
    }
}

impl GitHubConfig {
    /// Reads the token from the configured environment variable.
    pub fn token(&self) -> Option<String> {
        env::var(&self.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

/// Logging settings.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log at debug level when `REPO_WALKER_LOG` is not set.
    pub debug: bool,
}

impl LoggingConfig {
    /// The filter directive used when `REPO_WALKER_LOG` is not set.
    pub fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "warn"
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read or
    /// does not contain a valid configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    /// use repo_walker_cli::config::AppConfig;
    ///
    /// let config = AppConfig::load(Path::new("./repo-walker.toml"))?;
    /// println!("Using {}", config.github.api_url);
    /// # Ok::<(), repo_walker_cli::errors::Error>(())
    /// ```
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }

    /// Loads the configuration named on the command line, or the default file.
    ///
    /// An explicitly named file must exist. The default file is optional and
    /// the built-in defaults are used when it is missing.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    debug!("No configuration file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Saves the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }
}
