//! Equipment lookup bot entry point

use std::sync::Arc;
use anyhow::{Context, Result};
use lb_core::NavigationEngine;
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod keyboard;
mod transport;

use config::BotConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine, the variables may come from the environment
    let _ = dotenvy::dotenv();
    
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    
    info!("Starting equipment lookup bot");
    
    let config = BotConfig::from_env().context("Failed to read configuration")?;
    info!(?config, "Configuration loaded");
    
    let dataset = lb_data::load_dataset(&config.dataset_path, config.load_options.clone())
        .await
        .with_context(|| format!("Failed to load dataset from {}", config.dataset_path.display()))?;
    
    let engine = Arc::new(
        NavigationEngine::new(dataset).with_header_label(config.header_label.clone()),
    );
    
    if let Some(ttl) = config.session_idle_ttl {
        info!(ttl_secs = ttl.as_secs(), "Idle session eviction enabled");
        transport::spawn_idle_sweeper(engine.sessions().clone(), ttl);
    }
    
    let bot = Bot::new(config.bot_token.clone());
    transport::run(bot, engine).await;
    
    Ok(())
}
