//! API client for communicating with the FinOps Guardian server

use anyhow::{Context, Result};
use guardian_lib::{
    explain::ExplanationOutcome, hygiene::ZombieReport, BillingAnalysis, CostRecord,
    OptimizationRecommendation, RemediationOutcome, RemediationSession,
};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

/// API client for the Guardian server
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(90))
            .build()
            .context("Failed to create HTTP client")?;

        let mut base_url = Url::parse(base_url).context("Invalid API URL")?;
        // Without a trailing slash, join() replaces the last path segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, error_message(&body));
        }

        response.json().await.context("Failed to parse response")
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, error_message(&body));
        }

        response.json().await.context("Failed to parse response")
    }
}

/// Prefer the server's `error` field over the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.to_string())
}

/// Query string for simulation parameters
pub fn simulation_query(days: Option<u32>, spike: Option<f64>) -> String {
    let mut params = Vec::new();
    if let Some(days) = days {
        params.push(format!("days={}", days));
    }
    if let Some(spike) = spike {
        params.push(format!("spike={}", spike));
    }
    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

// API request/response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationList {
    pub recommendations: Vec<OptimizationRecommendation>,
    pub total: usize,
    pub potential_savings: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub record: CostRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_cost: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediateRequest {
    pub session: RemediationSession,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediateResponse {
    pub session: RemediationSession,
    pub outcome: RemediationOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullAnalysis {
    pub billing: BillingAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ExplanationOutcome>,
    pub zombies: ZombieReport,
    pub recommendations: RecommendationList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
