//! HTTP server command
//!
//! Builds the service over PostgreSQL (running migrations first) or over the
//! in-memory engine, then serves until Ctrl+C/SIGTERM.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use todoctl_server::auth::{Argon2Hasher, CredentialHasher, TokenIssuer};
use todoctl_server::db::{create_pool, migrations, MemoryStore, Repository};
use todoctl_server::http::{run_server, ServerConfig};
use todoctl_server::service::{Deadline, Service};

use super::load_config;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config and TODOCTL_BIND)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config and DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Use the in-memory engine instead of PostgreSQL (data is lost on exit)
    #[arg(long)]
    pub memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    config.server.cors_permissive |= args.cors_permissive;
    config.validate().context("Invalid configuration")?;

    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher);

    let repo = if args.memory {
        tracing::warn!("Using in-memory storage, nothing will be persisted");
        Repository::memory(Arc::new(MemoryStore::new(hasher.clone())))
    } else {
        let pool = create_pool(&config.database)
            .await
            .context("Failed to create database pool")?;
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
        Repository::postgres(pool, hasher.clone())
    };

    let tokens = TokenIssuer::new(
        &config.auth.signing_key,
        Duration::from_secs(config.auth.token_ttl_secs),
    );
    let deadline = Deadline::new(Duration::from_millis(config.request_timeout_ms));
    let service = Service::new(repo, hasher, tokens, deadline);

    tracing::info!("Starting todoctl server on {}", config.server.bind_addr);

    let server_config = ServerConfig {
        bind_addr: config.server.bind_addr,
        cors_permissive: config.server.cors_permissive,
    };
    run_server(service, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
