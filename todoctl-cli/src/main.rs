//! todoctl CLI - multi-user to-do list server
//!
//! Entry point for the `todoctl` binary:
//! - `serve`: run the HTTP API over PostgreSQL (or the in-memory engine)
//! - `migrate`: create the schema
//! - `config`: inspect the effective configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::{ConfigArgs, MigrateArgs, ServeArgs};

#[derive(Parser, Debug)]
#[command(
    name = "todoctl",
    author,
    version,
    about = "Multi-user to-do lists over PostgreSQL",
    long_about = "Serve a token-authenticated HTTP API for to-do lists and items. \
                  Every read and write is scoped to the lists the caller owns."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.todoctl/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Create or update the database schema
    Migrate(MigrateArgs),
    /// Inspect configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine
    dotenvy::dotenv().ok();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config_path).await?,
        Commands::Migrate(args) => commands::run_migrate(args, config_path).await?,
        Commands::Config(args) => commands::run_config(args, config_path)?,
    }
    Ok(())
}
