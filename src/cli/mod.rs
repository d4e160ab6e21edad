//
//  octane-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod attachment;
mod completion;
mod config;
mod create;
mod get;
mod types;
mod update;

pub use attachment::AttachmentCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use create::{CreateCommand, PartialFailure};
pub use get::GetCommand;
pub use types::TypesCommand;
pub use update::UpdateCommand;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::api::{OctaneClient, Payload, Scope};
use crate::config::Config;
use crate::output::{OutputFormat, OutputWriter};

/// Work with ALM Octane from the command line
#[derive(Parser, Debug)]
#[command(
    name = "octane",
    version,
    about = "Work with ALM Octane from the command line",
    long_about = "octane is a CLI for the ALM Octane REST API.\n\n\
                  It reads, creates and updates work items, tests and other entities,\n\
                  and transfers attachments.",
    propagate_version = true,
    after_help = "Use 'octane <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options shared by every command
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Octane server URL
    #[arg(long, global = true, env = "OCTANE_URL")]
    pub url: Option<String>,

    /// API access key client id
    #[arg(long, global = true, env = "OCTANE_API_KEY")]
    pub api_key: Option<String>,

    /// API access key client secret
    #[arg(long, global = true, env = "OCTANE_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Shared space id
    #[arg(long, short = 's', global = true, env = "OCTANE_SPACE")]
    pub space: Option<String>,

    /// Workspace id
    #[arg(long, short = 'w', global = true, env = "OCTANE_WORKSPACE")]
    pub workspace: Option<String>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "OCTANE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

impl GlobalOptions {
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_path(),
        }
    }

    /// Loads the config file and applies command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_from(&self.config_path()?)?;
        let server = &mut config.server;

        if let Some(url) = &self.url {
            server.url = Some(url.clone());
        }
        if let Some(api_key) = &self.api_key {
            server.api_key = Some(api_key.clone());
        }
        if let Some(secret) = &self.secret {
            server.secret = Some(secret.clone());
        }
        if let Some(space) = &self.space {
            server.space_id = Some(space.clone());
            // a workspace from the file belongs to the file's space
            server.workspace_id = None;
        }
        if let Some(workspace) = &self.workspace {
            server.workspace_id = Some(workspace.clone());
        }

        Ok(config)
    }

    /// Builds a client scoped to the configured space and workspace.
    pub fn client(&self) -> Result<OctaneClient> {
        let config = self.load_config()?;
        let client = OctaneClient::new(config.client_config()?)?;
        let scope: Scope = config.scope();
        Ok(client.scoped(scope))
    }

    pub fn writer(&self) -> OutputWriter {
        OutputWriter::new(self.format)
    }
}

/// Reads a JSON entity or entity array from a file, or stdin for `-`.
pub(crate) fn read_payload(input: &str) -> Result<Payload> {
    let content = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
    };

    let value: Value =
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", input))?;
    Ok(Payload::try_from(value)?)
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read entities
    #[command(visible_alias = "ls")]
    Get(GetCommand),

    /// Create entities in bulk
    Create(CreateCommand),

    /// Update entities
    Update(UpdateCommand),

    /// Download or upload attachments
    #[command(visible_alias = "att")]
    Attachment(AttachmentCommand),

    /// List the supported entity types
    Types(TypesCommand),

    /// Manage configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_override_clears_file_workspace() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nspace_id = \"1\"\nworkspace_id = \"2\"\n",
        )
        .unwrap();

        let global = GlobalOptions {
            config: Some(path),
            space: Some("9".to_string()),
            ..Default::default()
        };
        let config = global.load_config().unwrap();
        assert_eq!(config.server.space_id.as_deref(), Some("9"));
        assert_eq!(config.server.workspace_id, None);
    }

    #[test]
    fn test_read_payload_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stories.json");
        std::fs::write(&path, r#"[{"name": "a"}, {"name": "b"}]"#).unwrap();

        let payload = read_payload(path.to_str().unwrap()).unwrap();
        assert_eq!(payload.into_vec().len(), 2);
    }

    #[test]
    fn test_cli_parses_get() {
        let cli = Cli::try_parse_from([
            "octane", "get", "defects", "--fields", "id,name,severity", "--limit", "5",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Get(_)));
    }
}
