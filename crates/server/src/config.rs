//! Server configuration

use anyhow::{Context, Result};
use guardian_lib::explain::GeminiConfig;
use serde::Deserialize;

/// FinOps Guardian server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GuardianConfig {
    /// Instance name used in structured logs
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// HTTP port for the API, health and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Gemini API key; explanations degrade to a warning without it
    #[serde(default = "default_gemini_api_key")]
    pub gemini_api_key: Option<String>,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_gemini_endpoint")]
    pub gemini_endpoint: String,

    /// Timeout for the explanation call in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Idle hours after which an untagged resource is a zombie
    #[serde(default = "default_zombie_idle_hours")]
    pub zombie_idle_hours: u32,

    /// IQR fence multiplier
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,

    /// Days simulated when a request does not specify them
    #[serde(default = "default_days")]
    pub default_days: u32,

    /// Spike cost injected when a request does not specify it
    #[serde(default = "default_spike")]
    pub default_spike: f64,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "finops-guardian".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_gemini_api_key() -> Option<String> {
    std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty())
}

fn default_gemini_model() -> String {
    GeminiConfig::default().model
}

fn default_gemini_endpoint() -> String {
    GeminiConfig::default().endpoint
}

fn default_request_timeout() -> u64 {
    60
}

fn default_zombie_idle_hours() -> u32 {
    24
}

fn default_iqr_multiplier() -> f64 {
    1.5
}

fn default_days() -> u32 {
    30
}

fn default_spike() -> f64 {
    500.0
}

impl GuardianConfig {
    /// Load configuration from `GUARDIAN_*` environment variables
    pub fn load() -> Result<Self> {
        let source = config::Config::builder()
            .add_source(config::Environment::with_prefix("GUARDIAN"))
            .build()
            .context("Failed to read configuration")?;

        Self::from_source(source)
    }

    /// Deserialize from an already built configuration source
    pub fn from_source(source: config::Config) -> Result<Self> {
        source
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Settings for the Gemini explanation client
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            endpoint: self.gemini_endpoint.clone(),
            model: self.gemini_model.clone(),
            api_key: self.gemini_api_key.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_source() {
        let source = config::Config::builder().build().unwrap();
        let config = GuardianConfig::from_source(source).unwrap();

        assert_eq!(config.api_port, 8080);
        assert_eq!(config.gemini_model, "gemini-2.5-flash-lite");
        assert_eq!(config.zombie_idle_hours, 24);
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.default_days, 30);
        assert_eq!(config.default_spike, 500.0);
    }

    #[test]
    fn test_overrides() {
        let source = config::Config::builder()
            .set_override("api_port", 9090)
            .unwrap()
            .set_override("gemini_api_key", "secret")
            .unwrap()
            .set_override("zombie_idle_hours", 12)
            .unwrap()
            .build()
            .unwrap();
        let config = GuardianConfig::from_source(source).unwrap();

        assert_eq!(config.api_port, 9090);
        assert_eq!(config.zombie_idle_hours, 12);
        assert_eq!(config.gemini().api_key.as_deref(), Some("secret"));
    }
}
