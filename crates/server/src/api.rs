//! HTTP API for the dashboard, health checks and Prometheus metrics

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use guardian_lib::{
    billing::{BillingError, BillingGenerator},
    explain::{explain_or_warn, ExplanationOutcome, ExplanationRequest, ExplanationService},
    health::{ComponentStatus, HealthRegistry},
    hygiene::ZombieReport,
    observability::{GuardianMetrics, StructuredLogger},
    BillingAnalysis, CostRecord, Guardian, InstanceUsage, OptimizationRecommendation,
    RemediationOutcome, RemediationSession, Resource,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Bounds of the simulated period in days
pub const MIN_DAYS: u32 = 10;
pub const MAX_DAYS: u32 = 60;

/// Values used when a request leaves simulation parameters out
#[derive(Debug, Clone)]
pub struct SimulationDefaults {
    pub days: u32,
    pub spike: f64,
    /// Log text attached to explanation requests
    pub log_text: String,
}

impl SimulationDefaults {
    fn resolve(&self, params: &SimulationParams) -> Result<(u32, f64), ApiError> {
        let days = params.days.unwrap_or(self.days).clamp(MIN_DAYS, MAX_DAYS);
        let spike = params.spike.unwrap_or(self.spike);
        if !spike.is_finite() || spike < 0.0 {
            return Err(ApiError::bad_request(format!(
                "spike must be a non-negative number, got {}",
                spike
            )));
        }
        Ok((days, spike))
    }
}

/// Shared application state
pub struct AppState {
    pub guardian: Guardian,
    pub explainer: Arc<dyn ExplanationService>,
    pub health_registry: HealthRegistry,
    pub metrics: GuardianMetrics,
    pub logger: StructuredLogger,
    pub defaults: SimulationDefaults,
    pub inventory: Vec<Resource>,
    pub instance_usage: Vec<InstanceUsage>,
}

impl AppState {
    /// Call the explanation service, recording metrics and folding errors
    pub async fn explain(&self, request: &ExplanationRequest) -> ExplanationOutcome {
        let start = Instant::now();
        self.metrics.inc_explanations_requested();

        let outcome = explain_or_warn(self.explainer.as_ref(), request).await;

        let elapsed = start.elapsed().as_secs_f64();
        self.metrics.observe_explanation_latency(elapsed);
        if !outcome.ok {
            self.metrics.inc_explanation_errors(self.explainer.name());
        }
        self.logger
            .log_explanation(self.explainer.name(), outcome.ok, elapsed);

        outcome
    }
}

/// Error body returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request failure mapped to an HTTP status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::InvalidRange { .. } | BillingError::InvalidSpike(_) => {
                Self::bad_request(err.to_string())
            }
            BillingError::Csv(_) | BillingError::Io(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Query parameters for simulated billing
#[derive(Debug, Default, Deserialize)]
pub struct SimulationParams {
    pub days: Option<u32>,
    pub spike: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationList {
    pub recommendations: Vec<OptimizationRecommendation>,
    pub total: usize,
    /// Sum of the fixed savings amounts in USD per month
    pub potential_savings: f64,
}

impl RecommendationList {
    fn new(recommendations: Vec<OptimizationRecommendation>) -> Self {
        let potential_savings = recommendations
            .iter()
            .filter_map(|r| r.estimated_savings.amount())
            .sum();
        Self {
            total: recommendations.len(),
            recommendations,
            potential_savings,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplainBody {
    pub record: CostRecord,
    #[serde(default)]
    pub log_text: Option<String>,
    #[serde(default)]
    pub baseline_cost: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemediateBody {
    #[serde(default)]
    pub session: RemediationSession,
    /// Ids to stop, restricted to current zombies; defaults to the whole scan
    #[serde(default)]
    pub zombie_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediateResponse {
    pub session: RemediationSession,
    pub outcome: RemediationOutcome,
}

/// Everything the dashboard shows after one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullAnalysis {
    pub billing: BillingAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ExplanationOutcome>,
    pub zombies: ZombieReport,
    pub recommendations: RecommendationList,
}

/// Health check response - returns 200 if healthy or degraded, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

async fn billing(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SimulationParams>,
) -> Result<Json<BillingAnalysis>, ApiError> {
    let (days, spike) = state.defaults.resolve(&params)?;
    let series = BillingGenerator::new().generate(days, spike)?;
    Ok(Json(state.guardian.analyze_billing(series)))
}

async fn zombies(State(state): State<Arc<AppState>>) -> Json<ZombieReport> {
    Json(state.guardian.scan_zombies(&state.inventory))
}

async fn recommendations(State(state): State<Arc<AppState>>) -> Json<RecommendationList> {
    Json(RecommendationList::new(
        state.guardian.recommend(&state.instance_usage),
    ))
}

async fn explain(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExplainBody>,
) -> Json<ExplanationOutcome> {
    let log_text = body
        .log_text
        .unwrap_or_else(|| state.defaults.log_text.clone());
    let request = ExplanationRequest::new(&body.record, log_text).with_baseline(body.baseline_cost);

    Json(state.explain(&request).await)
}

async fn remediate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RemediateBody>,
) -> Json<RemediateResponse> {
    // Only ids the scan still reports as zombies can be stopped
    let zombies = state.guardian.scan_zombies(&state.inventory).zombie_ids;
    let zombie_ids = match body.zombie_ids {
        Some(ids) => ids.into_iter().filter(|id| zombies.contains(id)).collect(),
        None => zombies,
    };

    let (session, outcome) = body.session.remediate(&zombie_ids);
    if let RemediationOutcome::Stopped { ref resource_ids } = outcome {
        state.metrics.inc_remediations_simulated();
        state.logger.log_remediation(resource_ids);
    }

    Json(RemediateResponse { session, outcome })
}

async fn analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SimulationParams>,
) -> Result<Json<FullAnalysis>, ApiError> {
    let (days, spike) = state.defaults.resolve(&params)?;
    let series = BillingGenerator::new().generate(days, spike)?;
    let billing = state.guardian.analyze_billing(series);

    let explanation = match billing.explanation_request(&state.defaults.log_text) {
        Some(request) => Some(state.explain(&request).await),
        None => None,
    };

    Ok(Json(FullAnalysis {
        billing,
        explanation,
        zombies: state.guardian.scan_zombies(&state.inventory),
        recommendations: RecommendationList::new(
            state.guardian.recommend(&state.instance_usage),
        ),
    }))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/billing", get(billing))
        .route("/api/v1/zombies", get(zombies))
        .route("/api/v1/recommendations", get(recommendations))
        .route("/api/v1/explain", post(explain))
        .route("/api/v1/remediate", post(remediate))
        .route("/api/v1/analysis", get(analysis))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
