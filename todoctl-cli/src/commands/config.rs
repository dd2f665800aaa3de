//! Configuration inspection commands

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todoctl_core::AppConfig;

use super::load_config;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration (signing key redacted)
    Show(ShowArgs),
    /// Show config file path
    Path,
    /// Check that the server can start with this configuration
    Validate,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Print JSON instead of TOML
    #[arg(long)]
    pub json: bool,
}

pub fn run_config(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Show(args) => run_show(args, config_path),
        ConfigCommands::Path => run_path(config_path),
        ConfigCommands::Validate => run_validate(config_path),
    }
}

fn run_show(args: ShowArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?.redacted();

    let rendered = if args.json {
        serde_json::to_string_pretty(&config).context("Failed to render config as JSON")?
    } else {
        toml::to_string_pretty(&config).context("Failed to render config as TOML")?
    };
    println!("{}", rendered);
    Ok(())
}

fn run_path(config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", AppConfig::config_path().display()),
    }
    Ok(())
}

fn run_validate(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    config.validate().context("Invalid configuration")?;
    println!("Configuration OK");
    Ok(())
}
