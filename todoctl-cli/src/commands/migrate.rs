//! Schema migration command

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use todoctl_server::db::{create_pool, migrations};

use super::load_config;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config and DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs, config_path: Option<&Path>) -> Result<()> {
    let mut database = load_config(config_path)?.database;
    if let Some(url) = args.database_url {
        database.url = url;
    }

    let pool = create_pool(&database)
        .await
        .context("Failed to create database pool")?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Migrations complete");
    Ok(())
}
