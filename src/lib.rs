pub mod cli;
pub mod core;
pub mod entrypoints;
pub mod providers;
pub mod server;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::config::AppConfig;
use crate::providers::FrankfurterProvider;
use crate::server::AppState;

/// Builds the handler state for a loaded config.
pub fn build_state(config: &AppConfig) -> Result<AppState> {
    let provider = FrankfurterProvider::new(
        &config.upstream.base_url,
        Duration::from_secs(config.upstream.timeout_secs),
    )?;
    Ok(AppState::new(Arc::new(provider)))
}

pub async fn run(config_path: Option<&str>) -> Result<()> {
    info!("fxrelay starting...");

    let config = AppConfig::load(config_path)?;
    debug!("Loaded config: {config:#?}");

    let state = build_state(&config)?;
    server::serve(&config, state).await
}
