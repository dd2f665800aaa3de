//! Configuration for the todoctl server
//!
//! Loaded from `~/.todoctl/config.toml` (or an explicit path), then
//! overridden by environment variables. A missing file is not an error:
//! every field has a default, but the default signing key must be replaced
//! before the server will start.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Placeholder signing key; `validate()` refuses to run with it.
pub const DEFAULT_SIGNING_KEY: &str = "change-me";

/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_TTL_SECS: u64 = 366 * 24 * 60 * 60;

/// Environment overrides, applied after the file is read
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_SIGNING_KEY: &str = "TODOCTL_SIGNING_KEY";
pub const ENV_BIND: &str = "TODOCTL_BIND";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub auth: AuthSection,
    /// Deadline applied to every data-access call, in milliseconds
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind_addr: SocketAddr,
    pub cors_permissive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
    /// How long a request may wait for a pooled connection, in milliseconds
    pub acquire_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    pub signing_key: String,
    pub token_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSection::default(),
            database: DatabaseSection::default(),
            auth: AuthSection::default(),
            request_timeout_ms: 5_000,
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_permissive: false,
        }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/todoctl".to_string(),
            max_connections: 5,
            acquire_timeout_ms: 3_000,
        }
    }
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            signing_key: DEFAULT_SIGNING_KEY.to_string(),
            token_ttl_secs: 12 * 60 * 60,
        }
    }
}

impl AppConfig {
    /// Default config file path: ~/.todoctl/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".todoctl/config.toml")
    }

    /// Load from `path` (or the default path), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let default_path = Self::config_path();
        let path = path.unwrap_or(&default_path);

        let mut config = Self::from_file(path)?;
        config.apply_env_with(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Read a TOML file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CoreError::config_parse(path, e))
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database.url = url;
        }
        if let Some(key) = lookup(ENV_SIGNING_KEY) {
            self.auth.signing_key = key;
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.server.bind_addr = bind.parse().map_err(|_| {
                CoreError::config(format!("{} is not a socket address: {}", ENV_BIND, bind))
            })?;
        }
        Ok(())
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.auth.signing_key.is_empty() || self.auth.signing_key == DEFAULT_SIGNING_KEY {
            return Err(CoreError::config(format!(
                "auth.signing_key must be set (or export {})",
                ENV_SIGNING_KEY
            )));
        }
        if self.database.max_connections == 0 {
            return Err(CoreError::config("database.max_connections must be at least 1"));
        }
        if self.database.acquire_timeout_ms == 0 {
            return Err(CoreError::config("database.acquire_timeout_ms must be at least 1"));
        }
        if self.auth.token_ttl_secs == 0 || self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(CoreError::config(format!(
                "auth.token_ttl_secs must be between 1 and {}",
                MAX_TOKEN_TTL_SECS
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(CoreError::config("request_timeout_ms must be at least 1"));
        }
        Ok(())
    }

    /// Copy with secrets blanked, for printing.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.auth.signing_key = "<redacted>".to_string();
        copy
    }
}
