//! Google Gemini provider
//!
//! Calls the Generative Language REST API `generateContent` method and
//! classifies failures into [`ExplainError`] variants.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{build_prompt, ExplainError, ExplanationRequest, ExplanationService};

/// Gemini provider configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

/// Gemini `generateContent` client
#[derive(Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ExplainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExplainError::Transport(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn generate_url(&self) -> Result<Url, ExplainError> {
        let base = Url::parse(&self.config.endpoint)
            .map_err(|e| ExplainError::Transport(format!("invalid endpoint: {}", e)))?;
        base.join(&format!("v1beta/models/{}:generateContent", self.config.model))
            .map_err(|e| ExplainError::Transport(format!("invalid model path: {}", e)))
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn classify_status(status: StatusCode, body: &str) -> ExplainError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ExplainError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => ExplainError::QuotaExceeded(message),
        _ => ExplainError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, ExplainError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ExplainError::MalformedResponse(
            "response contained no text".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl ExplanationService for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn explain(&self, request: &ExplanationRequest) -> Result<String, ExplainError> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ExplainError::MissingApiKey),
        };

        let start = Instant::now();
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(build_prompt(request)),
                }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url()?)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExplainError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ExplainError::MalformedResponse(e.to_string()))?;

        debug!(
            model = %self.config.model,
            latency_ms = start.elapsed().as_millis() as u64,
            "Gemini explanation received"
        );

        extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CostRecord;
    use chrono::NaiveDate;
    use mockito::Matcher;

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-lite:generateContent";

    fn client_for(server: &mockito::ServerGuard, api_key: Option<&str>) -> GeminiClient {
        GeminiClient::new(GeminiConfig {
            endpoint: server.url(),
            api_key: api_key.map(str::to_string),
            timeout_secs: 5,
            ..GeminiConfig::default()
        })
        .unwrap()
    }

    fn request() -> ExplanationRequest {
        let record = CostRecord::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), 500.0);
        ExplanationRequest::new(&record, "[LOG 14:10] Infinite loop")
    }

    #[tokio::test]
    async fn test_explain_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Regex("Infinite loop".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"1. What happened? "},{"text":"A runaway job."}]}}]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, Some("test-key"));
        let text = client.explain(&request()).await.unwrap();

        assert_eq!(text, "1. What happened? A runaway job.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, None);
        assert!(!client.has_api_key());
        assert_eq!(
            client.explain(&request()).await.unwrap_err(),
            ExplainError::MissingApiKey
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_auth_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#)
            .create_async()
            .await;

        let err = client_for(&server, Some("bad")).explain(&request()).await.unwrap_err();
        assert_eq!(err, ExplainError::Authentication("API key not valid".to_string()));
    }

    #[tokio::test]
    async fn test_quota_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .with_status(429)
            .with_body(r#"{"error":{"code":429,"message":"Resource exhausted","status":"RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let err = client_for(&server, Some("k")).explain(&request()).await.unwrap_err();
        assert!(matches!(err, ExplainError::QuotaExceeded(_)));
    }

    #[tokio::test]
    async fn test_server_error_with_plain_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let err = client_for(&server, Some("k")).explain(&request()).await.unwrap_err();
        assert_eq!(
            err,
            ExplainError::Api {
                status: 500,
                message: "upstream exploded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server, Some("k")).explain(&request()).await.unwrap_err();
        assert!(matches!(err, ExplainError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let err = client_for(&server, Some("k")).explain(&request()).await.unwrap_err();
        assert!(matches!(err, ExplainError::MalformedResponse(_)));
    }

    #[test]
    fn test_generate_url() {
        let client = GeminiClient::new(GeminiConfig::default()).unwrap();
        assert_eq!(
            client.generate_url().unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
    }
}
