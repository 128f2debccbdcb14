//! FinOps Guardian - cost anomaly and resource hygiene service
//!
//! Serves simulated billing analysis, zombie detection and right-sizing
//! recommendations over HTTP, with spike explanations from Gemini.

use anyhow::Result;
use finops_guardian::{api, build_state, config::GuardianConfig};
use guardian_lib::health::HealthRegistry;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const GUARDIAN_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting finops-guardian");

    let config = GuardianConfig::load()?;
    info!(
        instance = %config.instance_name,
        port = config.api_port,
        model = %config.gemini_model,
        "Guardian configured"
    );

    let health_registry = HealthRegistry::new();
    let state = build_state(&config, health_registry.clone()).await?;
    state
        .logger
        .log_startup(GUARDIAN_VERSION, config.gemini_api_key.is_some());
    let logger = state.logger.clone();

    health_registry.set_ready(true).await;

    let api_handle = tokio::spawn(api::serve(config.api_port, Arc::new(state)));

    tokio::select! {
        result = api_handle => {
            match result {
                Ok(Ok(())) => info!("API server exited"),
                Ok(Err(e)) => error!(error = %e, "API server failed"),
                Err(e) => error!(error = %e, "API server task panicked"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
