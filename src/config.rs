//! Configuration management

use std::{env, path::Path};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_ENDPOINT, EvictionPolicy};
use crate::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Environment files to load after the config is read.
    /// Paths support ~ expansion. Loaded in order, later files override earlier.
    pub env_files: Vec<String>,
    /// Server configuration
    pub server: ServerConfig,
    /// Shared-secret authentication for `tools/call`
    pub auth: AuthConfig,
    /// Smartsheet API settings
    pub smartsheet: SmartsheetConfig,
    /// Client cache configuration
    pub cache: CacheConfig,
    /// Verbose logging
    pub debug: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Allow cross-origin requests
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_size: 10 * 1024 * 1024, // 10MB
            cors: true,
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Require `x-secret-key` on `tools/call` (default: true)
    pub require_auth: bool,
    /// Shared secret; supports a literal value or `env:VAR_NAME`.
    /// Empty or unset disables the check even when `require_auth` is on.
    pub secret_key: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            secret_key: None,
        }
    }
}

impl AuthConfig {
    /// Resolve the secret (expand `env:`), returning `None` when blank
    #[must_use]
    pub fn resolve_secret_key(&self) -> Option<String> {
        let raw = self.secret_key.as_deref()?;
        let value = match raw.strip_prefix("env:") {
            Some(var_name) => env::var(var_name).unwrap_or_default(),
            None => raw.to_string(),
        };
        if value.is_empty() { None } else { Some(value) }
    }
}

/// Smartsheet API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartsheetConfig {
    /// Endpoint used when a request carries no `x-smartsheet-endpoint`
    pub default_endpoint: String,
}

impl Default for SmartsheetConfig {
    fn default() -> Self {
        Self {
            default_endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Client cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of distinct credentials holding a live client
    pub capacity: usize,
    /// Which client to drop when full
    pub eviction: EvictionPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            eviction: EvictionPolicy::InsertionOrder,
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Files listed in `env_files` are loaded into the process environment
    /// before the final extraction, so `SMARTSHEET_GATEWAY_*` values they set
    /// take effect, as do the CLI's env-backed flags when parsed afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
        }

        let mut config = Self::extract(path)?;
        if !config.env_files.is_empty() {
            config.load_env_files();
            config = Self::extract(path)?;
        }
        config.validate()?;

        Ok(config)
    }

    /// Defaults, then the YAML file, then `SMARTSHEET_GATEWAY_` env
    fn extract(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(p) = path {
            figment = figment.merge(Yaml::file(p));
        }

        // Merge environment variables (SMARTSHEET_GATEWAY_ prefix)
        figment = figment.merge(Env::prefixed("SMARTSHEET_GATEWAY_").split("__"));

        figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.cache.capacity == 0 {
            return Err(Error::Config("cache.capacity must be at least 1".into()));
        }
        url::Url::parse(&self.smartsheet.default_endpoint).map_err(|e| {
            Error::Config(format!(
                "Invalid smartsheet.default_endpoint '{}': {e}",
                self.smartsheet.default_endpoint
            ))
        })?;
        Ok(())
    }

    /// Load environment files into the process environment.
    /// Supports ~ expansion. Files that don't exist are silently skipped.
    fn load_env_files(&self) {
        for path_str in &self.env_files {
            let expanded = if path_str.starts_with('~') {
                if let Some(home) = dirs::home_dir() {
                    path_str.replacen('~', &home.display().to_string(), 1)
                } else {
                    path_str.clone()
                }
            } else {
                path_str.clone()
            };

            let path = Path::new(&expanded);
            if path.exists() {
                match dotenvy::from_path(path) {
                    Ok(()) => {
                        tracing::info!("Loaded env file: {expanded}");
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load env file {expanded}: {e}");
                    }
                }
            } else {
                tracing::debug!("Env file not found (skipped): {expanded}");
            }
        }
    }
}
