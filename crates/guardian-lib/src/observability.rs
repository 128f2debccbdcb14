//! Observability infrastructure for FinOps Guardian
//!
//! Provides:
//! - Prometheus metrics (analysis and explanation latency, anomaly and
//!   hygiene counts, explanation failures)
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::models::{CostRecord, OptimizationRecommendation};

/// Buckets for in-process analysis latency (in seconds)
const ANALYSIS_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1,
];

/// Buckets for the external explanation call (in seconds)
const EXPLANATION_BUCKETS: &[f64] = &[0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<GuardianMetricsInner> = OnceLock::new();

struct GuardianMetricsInner {
    analysis_latency_seconds: Histogram,
    explanation_latency_seconds: Histogram,
    analyses_run: IntCounter,
    anomalies_detected: IntCounter,
    zombies_detected: IntGauge,
    recommendations_generated: IntGauge,
    explanations_requested: IntCounter,
    explanation_errors: IntCounterVec,
    remediations_simulated: IntCounter,
}

impl GuardianMetricsInner {
    fn new() -> Self {
        Self {
            analysis_latency_seconds: register_histogram!(
                "finops_guardian_analysis_latency_seconds",
                "Time spent running IQR anomaly detection",
                ANALYSIS_BUCKETS.to_vec()
            )
            .expect("Failed to register analysis_latency_seconds"),

            explanation_latency_seconds: register_histogram!(
                "finops_guardian_explanation_latency_seconds",
                "Time spent waiting for the explanation service",
                EXPLANATION_BUCKETS.to_vec()
            )
            .expect("Failed to register explanation_latency_seconds"),

            analyses_run: register_int_counter!(
                "finops_guardian_analyses_total",
                "Total number of billing analyses run"
            )
            .expect("Failed to register analyses_total"),

            anomalies_detected: register_int_counter!(
                "finops_guardian_anomalies_detected_total",
                "Total number of cost anomalies flagged"
            )
            .expect("Failed to register anomalies_detected"),

            zombies_detected: register_int_gauge!(
                "finops_guardian_zombies_detected",
                "Zombie resources found by the latest scan"
            )
            .expect("Failed to register zombies_detected"),

            recommendations_generated: register_int_gauge!(
                "finops_guardian_recommendations",
                "Right-sizing recommendations from the latest evaluation"
            )
            .expect("Failed to register recommendations"),

            explanations_requested: register_int_counter!(
                "finops_guardian_explanations_total",
                "Total number of explanation requests"
            )
            .expect("Failed to register explanations_total"),

            explanation_errors: register_int_counter_vec!(
                "finops_guardian_explanation_errors_total",
                "Explanation requests that failed, by provider",
                &["provider"]
            )
            .expect("Failed to register explanation_errors"),

            remediations_simulated: register_int_counter!(
                "finops_guardian_remediations_total",
                "Total number of simulated remediations"
            )
            .expect("Failed to register remediations_total"),
        }
    }
}

/// Guardian metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct GuardianMetrics {
    _private: (),
}

impl Default for GuardianMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardianMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(GuardianMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &GuardianMetricsInner {
        GLOBAL_METRICS.get_or_init(GuardianMetricsInner::new)
    }

    pub fn observe_analysis_latency(&self, duration_secs: f64) {
        self.inner().analysis_latency_seconds.observe(duration_secs);
    }

    pub fn observe_explanation_latency(&self, duration_secs: f64) {
        self.inner().explanation_latency_seconds.observe(duration_secs);
    }

    pub fn inc_analyses_run(&self) {
        self.inner().analyses_run.inc();
    }

    pub fn inc_anomalies_detected(&self) {
        self.inner().anomalies_detected.inc();
    }

    pub fn set_zombies_detected(&self, count: i64) {
        self.inner().zombies_detected.set(count);
    }

    pub fn set_recommendations_generated(&self, count: i64) {
        self.inner().recommendations_generated.set(count);
    }

    pub fn inc_explanations_requested(&self) {
        self.inner().explanations_requested.inc();
    }

    pub fn inc_explanation_errors(&self, provider: &str) {
        self.inner()
            .explanation_errors
            .with_label_values(&[provider])
            .inc();
    }

    pub fn inc_remediations_simulated(&self) {
        self.inner().remediations_simulated.inc();
    }
}

/// Structured logger for guardian events
///
/// Consistent JSON-formatted records for analyses, anomalies, hygiene
/// findings and service lifecycle.
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_analysis(&self, samples: usize, threshold: f64, anomalies: usize) {
        info!(
            event = "analysis_completed",
            instance = %self.instance,
            samples = samples,
            threshold = threshold,
            anomalies = anomalies,
            "Billing analysis completed"
        );
    }

    pub fn log_cost_anomaly(&self, record: &CostRecord, threshold: f64) {
        warn!(
            event = "cost_anomaly_detected",
            instance = %self.instance,
            date = %record.date,
            cost = record.cost,
            threshold = threshold,
            "Cost spike above IQR threshold"
        );
    }

    pub fn log_zombies(&self, zombie_ids: &[String]) {
        warn!(
            event = "zombies_detected",
            instance = %self.instance,
            count = zombie_ids.len(),
            resource_ids = ?zombie_ids,
            "Idle untagged resources found"
        );
    }

    pub fn log_recommendation(&self, rec: &OptimizationRecommendation) {
        info!(
            event = "recommendation_generated",
            instance = %self.instance,
            resource_id = %rec.resource_id,
            issue = ?rec.issue,
            savings = %rec.estimated_savings,
            "Right-sizing opportunity"
        );
    }

    pub fn log_explanation(&self, provider: &str, ok: bool, latency_secs: f64) {
        if ok {
            info!(
                event = "explanation_received",
                instance = %self.instance,
                provider = %provider,
                latency_secs = latency_secs,
                "Spike explanation received"
            );
        } else {
            warn!(
                event = "explanation_failed",
                instance = %self.instance,
                provider = %provider,
                latency_secs = latency_secs,
                "Spike explanation unavailable, showing warning"
            );
        }
    }

    pub fn log_remediation(&self, stopped: &[String]) {
        info!(
            event = "remediation_simulated",
            instance = %self.instance,
            count = stopped.len(),
            resource_ids = ?stopped,
            "Zombie instances stopped (simulated)"
        );
    }

    pub fn log_startup(&self, version: &str, explainer_enabled: bool) {
        info!(
            event = "guardian_started",
            instance = %self.instance,
            version = %version,
            explainer_enabled = explainer_enabled,
            "FinOps Guardian started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "guardian_shutdown",
            instance = %self.instance,
            reason = %reason,
            "FinOps Guardian shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guardian_metrics_creation() {
        let metrics = GuardianMetrics::new();

        metrics.observe_analysis_latency(0.0001);
        metrics.observe_explanation_latency(1.2);
        metrics.inc_analyses_run();
        metrics.inc_anomalies_detected();
        metrics.set_zombies_detected(1);
        metrics.set_recommendations_generated(2);
        metrics.inc_explanations_requested();
        metrics.inc_explanation_errors("gemini");
        metrics.inc_remediations_simulated();
    }

    #[test]
    fn test_metrics_exposed_in_registry() {
        let metrics = GuardianMetrics::new();
        metrics.inc_analyses_run();

        let names: Vec<String> = prometheus::gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();
        assert!(names.contains(&"finops_guardian_analyses_total".to_string()));
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test-instance");
        assert_eq!(logger.instance, "test-instance");
    }
}
