//! linechatd - line-oriented TCP chat server.
//!
//! Clients pick a nickname, then every line they send is broadcast to the
//! room or, with `/pm`, delivered to one named user.

mod chat_log;
mod config;
mod error;
mod handlers;
mod network;
mod state;

use crate::chat_log::ChatLog;
use crate::config::Config;
use crate::network::Gateway;
use crate::state::Hub;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = load_config()?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        "Starting linechatd"
    );

    let chat_log = if config.chat_log.enabled {
        ChatLog::spawn(&config.chat_log)
    } else {
        info!("Chat log disabled");
        ChatLog::disabled()
    };
    chat_log.record(format_args!(
        "Server started on {}",
        config.listen.address
    ));

    let hub = Arc::new(Hub::new(&config, chat_log));

    let gateway = Gateway::bind(config.listen.address, hub)
        .await
        .map_err(|e| {
            error!(address = %config.listen.address, error = %e, "Failed to bind listener");
            e
        })?;
    info!(address = %gateway.local_addr()?, "Accepting connections");

    gateway.run().await
}

/// Config from the path in the first argument, or `config.toml` if present,
/// or built-in defaults.
fn load_config() -> anyhow::Result<Config> {
    let explicit = std::env::args().nth(1);
    let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

    if explicit.is_none() && !Path::new(path).exists() {
        info!("No {path} found, using defaults");
        return Ok(Config::default());
    }

    let config = Config::load(path).map_err(|e| {
        error!(path = %path, error = %e, "Failed to load config");
        e
    })?;
    Ok(config)
}
