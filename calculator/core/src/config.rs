//! TOML Configuration File Support
//!
//! Centralized configuration loading for AuraCalc, supporting a TOML file at
//! `~/.config/auracalc/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! The API key is only ever read from the environment (`GEMINI_API_KEY`,
//! falling back to `API_KEY`), never from the file.
//!
//! # Example Configuration
//!
//! ```toml
//! [assistant]
//! model = "gemini-3-pro-preview"
//! temperature = 0.7
//! timeout_secs = 120
//! base_url = "https://generativelanguage.googleapis.com/v1beta/models"
//! greeting = "Hi! Ask me anything about math."
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{DEFAULT_BASE_URL, SYSTEM_INSTRUCTION};
use crate::session::DEFAULT_GREETING;

/// Model used when nothing else is configured
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Assistant section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantToml {
    /// Model identifier
    pub model: Option<String>,

    /// Sampling temperature (0.0-2.0)
    pub temperature: Option<f32>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Models endpoint of the API
    pub base_url: Option<String>,

    /// First assistant message of a session
    pub greeting: Option<String>,

    /// System instruction sent with every question
    pub system_prompt: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraCalcToml {
    /// Assistant configuration section
    pub assistant: AssistantToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Resolved settings for the math assistant
#[derive(Clone, Debug, PartialEq)]
pub struct AssistantConfig {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Models endpoint of the API
    pub base_url: String,
    /// API key from the environment
    pub api_key: Option<String>,
    /// First assistant message of a session
    pub greeting: String,
    /// System instruction sent with every question
    pub system_prompt: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(120),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            greeting: DEFAULT_GREETING.to_string(),
            system_prompt: SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

/// Centralized configuration for AuraCalc
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct AuraCalcConfig {
    /// Assistant configuration
    pub assistant: AssistantConfig,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for AuraCalcConfig {
    fn default() -> Self {
        Self {
            assistant: AssistantConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl AuraCalcConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check values that would make every request fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        let assistant = &self.assistant;
        if assistant.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "assistant.model must not be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&assistant.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "assistant.temperature must be between 0.0 and 2.0, got {}",
                assistant.temperature
            )));
        }
        if assistant.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "assistant.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if assistant.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "assistant.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/auracalc/config.toml` or
/// `~/.config/auracalc/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("auracalc").join("config.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or the
/// resulting values are invalid. A missing config file is not an error.
pub fn load_config() -> Result<AuraCalcConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<AuraCalcConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration using a custom environment lookup
fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AuraCalcConfig, ConfigError> {
    let mut config = AuraCalcConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: AuraCalcToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut AuraCalcConfig, toml: &AuraCalcToml) {
    let section = &toml.assistant;
    let assistant = &mut config.assistant;

    if let Some(ref model) = section.model {
        assistant.model.clone_from(model);
    }
    if let Some(temperature) = section.temperature {
        assistant.temperature = temperature;
    }
    if let Some(secs) = section.timeout_secs {
        assistant.timeout = Duration::from_secs(secs);
    }
    if let Some(ref base_url) = section.base_url {
        assistant.base_url.clone_from(base_url);
    }
    if let Some(ref greeting) = section.greeting {
        assistant.greeting.clone_from(greeting);
    }
    if let Some(ref prompt) = section.system_prompt {
        assistant.system_prompt.clone_from(prompt);
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut AuraCalcConfig, env: impl Fn(&str) -> Option<String>) {
    config.assistant.api_key = env("GEMINI_API_KEY")
        .or_else(|| env("API_KEY"))
        .filter(|k| !k.trim().is_empty());

    if let Some(model) = env("AURACALC_MODEL") {
        config.assistant.model = model;
        config.source = ConfigSource::Env;
    }
    if let Some(value) = env("AURACALC_TEMPERATURE") {
        match value.parse::<f32>() {
            Ok(temperature) => {
                config.assistant.temperature = temperature;
                config.source = ConfigSource::Env;
            }
            Err(_) => tracing::warn!(value = %value, "Ignoring invalid AURACALC_TEMPERATURE"),
        }
    }
    if let Some(value) = env("AURACALC_TIMEOUT_SECS") {
        match value.parse::<u64>() {
            Ok(secs) => {
                config.assistant.timeout = Duration::from_secs(secs);
                config.source = ConfigSource::Env;
            }
            Err(_) => tracing::warn!(value = %value, "Ignoring invalid AURACALC_TIMEOUT_SECS"),
        }
    }
    if let Some(base_url) = env("AURACALC_BASE_URL") {
        config.assistant.base_url = base_url;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Command-line overrides, applied on top of everything else
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Model override
    pub model: Option<String>,

    /// Temperature override
    pub temperature: Option<f32>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set model override
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    /// Set temperature override
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Apply overrides to a configuration and re-validate it
    pub fn apply(&self, config: &mut AuraCalcConfig) -> Result<(), ConfigError> {
        if self.model.is_some() || self.temperature.is_some() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref model) = self.model {
            config.assistant.model.clone_from(model);
        }
        if let Some(temperature) = self.temperature {
            config.assistant.temperature = temperature;
        }

        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AuraCalcConfig::default();
        assert_eq!(config.assistant.model, DEFAULT_MODEL);
        assert_eq!(config.assistant.timeout, Duration::from_secs(120));
        assert_eq!(config.assistant.greeting, DEFAULT_GREETING);
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.ends_with("auracalc/config.toml"));
        }
    }

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[assistant]
model = "gemini-2.5-flash"
temperature = 0.2
timeout_secs = 30
base_url = "http://localhost:8080/models"
greeting = "Ready."
system_prompt = "Answer with numbers only."
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(
            config.assistant,
            AssistantConfig {
                model: "gemini-2.5-flash".to_string(),
                temperature: 0.2,
                timeout: Duration::from_secs(30),
                base_url: "http://localhost:8080/models".to_string(),
                api_key: None,
                greeting: "Ready.".to_string(),
                system_prompt: "Answer with numbers only.".to_string(),
            }
        );
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = write_toml("[assistant]\ntimeout_secs = 10\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.assistant.timeout, Duration::from_secs(10));
        assert_eq!(config.assistant.model, DEFAULT_MODEL);
        assert_eq!(config.assistant.system_prompt, SYSTEM_INSTRUCTION);
    }

    #[test]
    fn test_parse_empty_toml() {
        let file = write_toml("");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.assistant, AssistantConfig::default());
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/auracalc/config.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_toml("[assistant\nmodel = ");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_toml("[assistant]\ntemperature = 3.5\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let file = write_toml("[assistant]\ntimeout_secs = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml("[assistant]\nmodel = \"file-model\"\ntimeout_secs = 30\n");
        let env = env_from(&[
            ("AURACALC_MODEL", "env-model"),
            ("AURACALC_TIMEOUT_SECS", "not-a-number"),
            ("GEMINI_API_KEY", "secret"),
        ]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.assistant.model, "env-model");
        // Unparsable values are ignored
        assert_eq!(config.assistant.timeout, Duration::from_secs(30));
        assert_eq!(config.assistant.api_key.as_deref(), Some("secret"));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_api_key_fallback() {
        let config = load_config_with_env(None, env_from(&[("API_KEY", "fallback")])).unwrap();
        assert_eq!(config.assistant.api_key.as_deref(), Some("fallback"));
        // The key alone does not change the reported source
        assert_eq!(config.source(), ConfigSource::Default);

        let config = load_config_with_env(None, env_from(&[("GEMINI_API_KEY", " ")])).unwrap();
        assert!(config.assistant.api_key.is_none());
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config =
            load_config_with_env(None, env_from(&[("AURACALC_MODEL", "env-model")])).unwrap();

        ConfigOverrides::new()
            .with_model("cli-model".to_string())
            .with_temperature(1.2)
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.assistant.model, "cli-model");
        assert!((config.assistant.temperature - 1.2).abs() < f32::EPSILON);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_empty_overrides_keep_source() {
        let mut config = AuraCalcConfig::default();
        ConfigOverrides::new().apply(&mut config).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut config = AuraCalcConfig::default();
        let result = ConfigOverrides::new()
            .with_temperature(-1.0)
            .apply(&mut config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
