//! Keygate - API key authentication gateway
//!
//! Verifies a shared API key against a stored bcrypt hash and gates a small
//! user management API, either per-request or via short-lived signed tokens.

use keygate::{api, auth, core, store};

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a .env file before reading the environment
    dotenvy::dotenv().ok();

    let cli_args = core::config::CliArgs::parse();

    // Key generation utility: print the hash an operator should configure
    if let Some(key) = &cli_args.hash_key {
        println!("{}", auth::hash_credential(key)?);
        return Ok(());
    }

    // Load configuration (CLI args, env vars, and config file). A missing or
    // malformed credential hash, secret or TTL aborts here, before any
    // listener opens.
    let config = match core::config::Config::load_from(cli_args) {
        Ok(cfg) => cfg,
        Err(e) => {
            // Print to stderr since logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging system based on configuration
    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Starting Keygate v{}", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Server configuration"
    );
    info!(
        mode = ?config.auth.mode,
        token_ttl_minutes = config.auth.token_ttl_minutes,
        "Authentication configuration"
    );

    // Build the immutable per-process state
    let state = api::handlers::AppState {
        users: Arc::new(store::UserStore::new()),
        auth: Arc::new(auth::AuthState::from_config(&config.auth)),
    };

    let server = api::ApiServer::new(&config, state);

    info!("Keygate initialized successfully");

    // Start serving (this will block until shutdown signal)
    server.serve().await?;

    Ok(())
}
