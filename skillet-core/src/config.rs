//! Configuration management for skillet
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (SKILLET_*)
//! 3. Config file (~/.config/skillet/config.toml)
//! 4. Default values

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Review-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Path to the codex executable
    pub codex_path: String,

    /// Model passed to codex review
    pub model: String,

    /// Branch used as the default comparison target
    pub base_branch: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            codex_path: "codex".to_string(),
            model: "gpt-5.1-codex-max".to_string(),
            base_branch: "main".to_string(),
        }
    }
}

/// Deep-research configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Processor tier for research task runs
    pub processor: String,

    /// How long to wait for a research run to complete
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            processor: "pro-fast".to_string(),
            timeout: Duration::from_secs(600),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Review configuration
    pub review: ReviewConfig,

    /// Research configuration
    pub research: ResearchConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/skillet/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("skillet").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - SKILLET_CODEX_PATH: Path to codex executable
    /// - SKILLET_MODEL: Model passed to codex review
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(codex_path) = std::env::var("SKILLET_CODEX_PATH") {
            self.review.codex_path = codex_path;
        }

        if let Ok(model) = std::env::var("SKILLET_MODEL") {
            self.review.model = model;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, codex_path: Option<String>, model: Option<String>) -> Self {
        if let Some(path) = codex_path {
            self.review.codex_path = path;
        }

        if let Some(m) = model {
            self.review.model = m;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(codex_path: Option<String>, model: Option<String>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(codex_path, model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.review.codex_path, "codex");
        assert_eq!(config.review.model, "gpt-5.1-codex-max");
        assert_eq!(config.review.base_branch, "main");
        assert_eq!(config.research.processor, "pro-fast");
        assert_eq!(config.research.timeout, Duration::from_secs(600));
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default()
            .with_cli_overrides(Some("/custom/codex".to_string()), Some("gpt-5".to_string()));

        assert_eq!(config.review.codex_path, "/custom/codex");
        assert_eq!(config.review.model, "gpt-5");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[review]
codex_path = "/usr/local/bin/codex"
model = "gpt-5.1-codex"
base_branch = "develop"

[research]
processor = "ultra"
timeout = "5m"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.review.codex_path, "/usr/local/bin/codex");
        assert_eq!(config.review.model, "gpt-5.1-codex");
        assert_eq!(config.review.base_branch, "develop");
        assert_eq!(config.research.processor, "ultra");
        assert_eq!(config.research.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[review]
base_branch = "trunk"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        // codex_path and model should use defaults
        assert_eq!(config.review.codex_path, "codex");
        assert_eq!(config.review.model, "gpt-5.1-codex-max");
        assert_eq!(config.review.base_branch, "trunk");
    }
}
