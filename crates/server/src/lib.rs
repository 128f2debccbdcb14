//! FinOps Guardian server
//!
//! HTTP API exposing simulated billing analysis, resource hygiene,
//! spike explanations and simulated remediation.

pub mod api;
pub mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use guardian_lib::{
    anomaly::IqrDetector,
    explain::{ExplanationService, GeminiClient},
    health::{components, HealthRegistry},
    hygiene::ZombieRule,
    inventory::{mock_instance_usage, mock_inventory, MOCK_INCIDENT_LOGS},
    observability::{GuardianMetrics, StructuredLogger},
    Guardian,
};

use crate::api::{AppState, SimulationDefaults};
use crate::config::GuardianConfig;

/// Build application state from configuration
///
/// Registers components with the health registry; the explainer is marked
/// degraded when no API key is configured.
pub async fn build_state(
    config: &GuardianConfig,
    health_registry: HealthRegistry,
) -> Result<AppState> {
    let detector = IqrDetector::new(config.iqr_multiplier).context("Invalid IQR multiplier")?;
    let logger = StructuredLogger::new(&config.instance_name);
    let guardian = Guardian::new(
        detector,
        ZombieRule::new(config.zombie_idle_hours),
        logger.clone(),
    );

    let gemini = GeminiClient::new(config.gemini()).context("Failed to create Gemini client")?;

    health_registry.register(components::DETECTOR).await;
    health_registry.register(components::RULE_ENGINE).await;
    health_registry.register(components::EXPLAINER).await;
    if !gemini.has_api_key() {
        health_registry
            .set_degraded(components::EXPLAINER, "No Gemini API key configured")
            .await;
    }

    let explainer: Arc<dyn ExplanationService> = Arc::new(gemini);

    Ok(AppState {
        guardian,
        explainer,
        health_registry,
        metrics: GuardianMetrics::new(),
        logger,
        defaults: SimulationDefaults {
            days: config.default_days,
            spike: config.default_spike,
            log_text: MOCK_INCIDENT_LOGS.to_string(),
        },
        inventory: mock_inventory(),
        instance_usage: mock_instance_usage(),
    })
}
