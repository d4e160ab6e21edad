//
//  octane-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module manages the CLI's connection settings, stored as TOML in a
//! platform-specific directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/octane/config.toml`
//! - **macOS**: `~/Library/Application Support/octane/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\octane\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [server]
//! url = "https://octane.example.com"
//! api_key = "my_client_id"
//! secret = "my_client_secret"
//! space_id = "1001"
//! workspace_id = "1002"
//! accept_invalid_certs = true
//! timeout_secs = 60
//! ```
//!
//! Every `[server]` value can be overridden per invocation with a command-line
//! flag or the matching `OCTANE_*` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::{ClientConfig, Scope};

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "url",
    "api_key",
    "secret",
    "space_id",
    "workspace_id",
    "accept_invalid_certs",
    "timeout_secs",
];

/// Global configuration container.
///
/// # Examples
///
/// ```rust
/// use octane_cli::config::Config;
///
/// let config = Config::default();
/// assert!(config.server.accept_invalid_certs);
/// assert!(config.server.url.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

/// Connection settings for one Octane server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server root URL, without `/api`.
    #[serde(default)]
    pub url: Option<String>,

    /// API access key client id.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API access key client secret.
    #[serde(default)]
    pub secret: Option<String>,

    /// Default shared space.
    #[serde(default)]
    pub space_id: Option<String>,

    /// Default workspace inside `space_id`.
    #[serde(default)]
    pub workspace_id: Option<String>,

    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_accept_invalid_certs() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            secret: None,
            space_id: None,
            workspace_id: None,
            accept_invalid_certs: default_accept_invalid_certs(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Loads the configuration from the default location, or returns the
    /// defaults when no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Writes the configuration, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "octane")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns a setting by key. The secret is redacted.
    pub fn get(&self, key: &str) -> Option<String> {
        let server = &self.server;
        match key {
            "url" => server.url.clone(),
            "api_key" => server.api_key.clone(),
            "secret" => server.secret.as_ref().map(|_| "********".to_string()),
            "space_id" => server.space_id.clone(),
            "workspace_id" => server.workspace_id.clone(),
            "accept_invalid_certs" => Some(server.accept_invalid_certs.to_string()),
            "timeout_secs" => server.timeout_secs.map(|t| t.to_string()),
            _ => None,
        }
    }

    /// Sets a setting by key.
    ///
    /// # Errors
    ///
    /// Fails for unknown keys and for values that do not parse.
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        let server = &mut self.server;
        match key {
            "url" => server.url = Some(value),
            "api_key" => server.api_key = Some(value),
            "secret" => server.secret = Some(value),
            "space_id" => server.space_id = Some(value),
            "workspace_id" => server.workspace_id = Some(value),
            "accept_invalid_certs" => {
                server.accept_invalid_certs = value
                    .parse()
                    .with_context(|| format!("'{}' is not true or false", value))?
            }
            "timeout_secs" => {
                server.timeout_secs = Some(
                    value
                        .parse()
                        .with_context(|| format!("'{}' is not a number of seconds", value))?,
                )
            }
            _ => bail!("Unknown config key '{}'. Valid keys: {}", key, CONFIG_KEYS.join(", ")),
        }
        Ok(())
    }

    /// Builds the client settings.
    ///
    /// # Errors
    ///
    /// Fails when the url, api key or secret is missing.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let server = &self.server;
        let url = server
            .url
            .clone()
            .context("No Octane URL configured. Set it with 'octane config set url <URL>' or OCTANE_URL")?;
        let api_key = server
            .api_key
            .clone()
            .context("No API key configured. Set it with 'octane config set api_key <KEY>' or OCTANE_API_KEY")?;
        let secret = server
            .secret
            .clone()
            .context("No API secret configured. Set it with 'octane config set secret <SECRET>' or OCTANE_SECRET")?;

        let mut config = ClientConfig::new(url, api_key, secret)
            .accept_invalid_certs(server.accept_invalid_certs);
        if let Some(secs) = server.timeout_secs {
            config = config.timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// The configured space/workspace, if any.
    pub fn scope(&self) -> Scope {
        Scope {
            space_id: self.server.space_id.clone(),
            workspace_id: self.server.workspace_id.clone(),
        }
    }
}
