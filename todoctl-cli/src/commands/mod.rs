//! Command implementations for todoctl CLI

pub mod config;
pub mod migrate;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};
use todoctl_core::AppConfig;

pub use config::{run_config, ConfigArgs};
pub use migrate::{run_migrate, MigrateArgs};
pub use serve::{run_serve, ServeArgs};

/// Load the config file (or defaults) with environment overrides applied.
pub(crate) fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    AppConfig::load(path).context("Failed to load configuration")
}
