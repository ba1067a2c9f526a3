//! Secrets management for skillet
//!
//! Secrets are stored separately from configuration to avoid accidental sharing.
//! The secrets file is located at `~/.config/skillet/secrets.toml` and must have
//! restrictive permissions (0600 on Unix).
//!
//! Loading priority:
//! 1. Environment variables (LINEAR_API_KEY, SENTRY_AUTH_TOKEN, PARALLEL_API_KEY,
//!    DATAFORSEO_USERNAME, DATAFORSEO_PASSWORD)
//! 2. Secrets file (~/.config/skillet/secrets.toml)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// Linear configuration
    pub linear: LinearSecrets,

    /// Sentry configuration
    pub sentry: SentrySecrets,

    /// Parallel configuration
    pub parallel: ParallelSecrets,

    /// DataForSEO configuration
    pub dataforseo: DataForSeoSecrets,
}

/// Linear-related secrets
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LinearSecrets {
    /// Linear API key
    pub api_key: Option<String>,
}

/// Sentry-related secrets
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SentrySecrets {
    /// Sentry auth token
    pub auth_token: Option<String>,
}

/// Parallel-related secrets
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ParallelSecrets {
    /// Parallel API key
    pub api_key: Option<String>,
}

/// DataForSEO-related secrets
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DataForSeoSecrets {
    /// DataForSEO account login
    pub username: Option<String>,

    /// DataForSEO account password
    pub password: Option<String>,
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        let secrets_path = Self::default_secrets_path();

        if let Some(path) = secrets_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        // Check file permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path).map_err(Error::Io)?;
            let mode = metadata.permissions().mode();

            // Check if file is readable by group or others (mode & 0o077)
            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }

            debug!(path = %path.display(), mode = format!("{:o}", mode & 0o777), "Secrets file permissions OK");
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        // Trim whitespace from stored values
        for value in [
            &mut secrets.linear.api_key,
            &mut secrets.sentry.auth_token,
            &mut secrets.parallel.api_key,
            &mut secrets.dataforseo.username,
            &mut secrets.dataforseo.password,
        ] {
            if let Some(v) = value {
                *v = v.trim().to_string();
            }
        }

        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/skillet/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("skillet").join("secrets.toml"))
    }

    /// Get Linear API key with environment variable override
    ///
    /// Priority: LINEAR_API_KEY env var > secrets file
    pub fn linear_api_key(&self) -> Option<String> {
        env_or_stored("LINEAR_API_KEY", self.linear.api_key.as_deref())
    }

    /// Get Sentry auth token with environment variable override
    ///
    /// Priority: SENTRY_AUTH_TOKEN env var > secrets file
    pub fn sentry_auth_token(&self) -> Option<String> {
        env_or_stored("SENTRY_AUTH_TOKEN", self.sentry.auth_token.as_deref())
    }

    /// Get Parallel API key with environment variable override
    ///
    /// Priority: PARALLEL_API_KEY env var > secrets file
    pub fn parallel_api_key(&self) -> Option<String> {
        env_or_stored("PARALLEL_API_KEY", self.parallel.api_key.as_deref())
    }

    /// Get DataForSEO credentials with environment variable override
    ///
    /// Priority: DATAFORSEO_USERNAME/DATAFORSEO_PASSWORD env vars > secrets file.
    /// Both halves must be present for the pair to be returned.
    pub fn dataforseo_credentials(&self) -> Option<(String, String)> {
        let username = env_or_stored("DATAFORSEO_USERNAME", self.dataforseo.username.as_deref())?;
        let password = env_or_stored("DATAFORSEO_PASSWORD", self.dataforseo.password.as_deref())?;
        Some((username, password))
    }

    /// Create a template secrets file at the default location
    ///
    /// Creates parent directories if needed and sets secure permissions
    pub fn create_template() -> Result<PathBuf> {
        let path = Self::default_secrets_path()
            .ok_or_else(|| Error::Config("Could not determine secrets path".to_string()))?;

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }

        // Don't overwrite existing file
        if path.exists() {
            return Err(Error::Config(format!(
                "Secrets file already exists at {}",
                path.display()
            )));
        }

        let template = r#"# Skillet Secrets
# This file contains sensitive credentials - do not share or commit to version control
#
# IMPORTANT: This file must have restrictive permissions (chmod 600)

[linear]
# Linear API key
# Create at: https://linear.app/settings/api
api_key = ""

[sentry]
# Sentry auth token
# Create at: https://sentry.io/settings/account/api/auth-tokens/
# Required scopes: event:read, org:read
auth_token = ""

[parallel]
# Parallel API key
# Create at: https://platform.parallel.ai
api_key = ""

[dataforseo]
# DataForSEO account credentials
# Create at: https://app.dataforseo.com/api-access
username = ""
password = ""
"#;

        std::fs::write(&path, template).map_err(Error::Io)?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, perms).map_err(Error::Io)?;
        }

        warn!(path = %path.display(), "Created secrets template - please edit and add your credentials");

        Ok(path)
    }
}

/// Resolve a credential, preferring the environment variable over the stored value
fn env_or_stored(var: &str, stored: Option<&str>) -> Option<String> {
    if let Ok(value) = std::env::var(var) {
        let value = value.trim().to_string();
        if !value.is_empty() {
            debug!("Using credential from {} environment variable", var);
            return Some(value);
        }
    }

    match stored {
        Some(value) if !value.is_empty() => {
            debug!("Using credential for {} from secrets file", var);
            Some(value.to_string())
        }
        _ => None,
    }
}
