//! Natural-language explanations for cost spikes
//!
//! The language model is an opaque external service behind the
//! [`ExplanationService`] trait. Every failure is returned as an
//! [`ExplainError`] and folded into one display string at the boundary,
//! so callers never have to handle the error themselves.

mod gemini;
mod prompt;

pub use gemini::{GeminiClient, GeminiConfig};
pub use prompt::build_prompt;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::CostRecord;

/// Prefix for explanation failures shown to the user
pub const WARNING_PREFIX: &str = "⚠️ Error talking to AI: ";

/// Input to the explanation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub date: NaiveDate,
    pub cost: f64,
    /// Typical daily cost quoted as the normal level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_cost: Option<f64>,
    pub log_text: String,
}

impl ExplanationRequest {
    pub fn new(record: &CostRecord, log_text: impl Into<String>) -> Self {
        Self {
            date: record.date,
            cost: record.cost,
            baseline_cost: None,
            log_text: log_text.into(),
        }
    }

    pub fn with_baseline(mut self, baseline_cost: Option<f64>) -> Self {
        self.baseline_cost = baseline_cost;
        self
    }
}

/// Failures talking to the explanation service
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExplainError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Seam for the external generative model
#[async_trait]
pub trait ExplanationService: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Ask for a prose explanation of the spike
    async fn explain(&self, request: &ExplanationRequest) -> Result<String, ExplainError>;
}

/// Display-ready explanation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationOutcome {
    pub ok: bool,
    pub text: String,
}

impl ExplanationOutcome {
    pub fn from_result(result: Result<String, ExplainError>) -> Self {
        let ok = result.is_ok();
        Self {
            ok,
            text: fold_for_display(result),
        }
    }
}

/// Fold an explanation result into the text shown to the user
pub fn fold_for_display(result: Result<String, ExplainError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => format!("{}{}", WARNING_PREFIX, e),
    }
}

/// Call the service and never fail
pub async fn explain_or_warn(
    service: &dyn ExplanationService,
    request: &ExplanationRequest,
) -> ExplanationOutcome {
    let result = service.explain(request).await;
    if let Err(ref e) = result {
        tracing::warn!(
            provider = %service.name(),
            date = %request.date,
            cost = request.cost,
            error = %e,
            "Explanation request failed"
        );
    }
    ExplanationOutcome::from_result(result)
}
