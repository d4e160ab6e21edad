//
//  octane-cli
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! Reads and writes the `[server]` settings of the configuration file.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use serde_json::json;

use crate::config::{Config, CONFIG_KEYS};
use crate::output::OutputFormat;

use super::GlobalOptions;

/// Manage configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print the value of a setting
    Get(GetArgs),

    /// Change a setting
    Set(SetArgs),

    /// Print all settings
    #[command(visible_alias = "ls")]
    List,

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Setting name
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Setting name
    pub key: String,

    /// New value
    pub value: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args, global),
            ConfigSubcommand::Set(args) => self.set(args, global),
            ConfigSubcommand::List => self.list(global),
            ConfigSubcommand::Path => self.path(global),
        }
    }

    fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        let config = Config::load_from(&global.config_path()?)?;
        if let Some(value) = config.get(&args.key) {
            println!("{}", value);
        }
        Ok(())
    }

    fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let path = global.config_path()?;
        let mut config = Config::load_from(&path)?;
        config.set(&args.key, args.value.clone())?;
        config.save_to(&path)?;

        let shown = config.get(&args.key).unwrap_or_default();
        eprintln!(
            "{} Set {} = {}",
            style("✓").green(),
            style(&args.key).cyan(),
            shown
        );
        Ok(())
    }

    fn list(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load_from(&global.config_path()?)?;

        if global.format == OutputFormat::Table {
            for key in CONFIG_KEYS {
                println!("{} = {}", key, config.get(key).unwrap_or_default());
            }
            return Ok(());
        }

        let settings: serde_json::Map<String, serde_json::Value> = CONFIG_KEYS
            .iter()
            .map(|key| (key.to_string(), json!(config.get(key))))
            .collect();
        global.writer().write(&settings)
    }

    fn path(&self, global: &GlobalOptions) -> Result<()> {
        println!("{}", global.config_path()?.display());
        Ok(())
    }
}
