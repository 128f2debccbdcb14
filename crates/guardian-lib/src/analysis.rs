//! Analysis pipeline feeding the presentation layer
//!
//! Bundles the detector and rule engines and exposes the three results
//! consumers render: billing series with anomalies, zombie inventory and
//! right-sizing recommendations.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::anomaly::{AnomalyReport, IqrDetector};
use crate::explain::ExplanationRequest;
use crate::hygiene::{RightSizingEngine, ZombieReport, ZombieRule};
use crate::models::{CostRecord, InstanceUsage, OptimizationRecommendation, Resource};
use crate::observability::{GuardianMetrics, StructuredLogger};

/// Billing series together with its anomaly report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingAnalysis {
    pub series: Vec<CostRecord>,
    pub report: AnomalyReport,
}

impl BillingAnalysis {
    /// Build the explanation request for the most recent spike, if any
    pub fn explanation_request(&self, log_text: &str) -> Option<ExplanationRequest> {
        let latest = self.report.latest()?;
        Some(
            ExplanationRequest::new(latest, log_text)
                .with_baseline(self.report.baseline_cost(&self.series)),
        )
    }
}

/// Analysis facade with instrumentation
pub struct Guardian {
    detector: IqrDetector,
    zombie_rule: ZombieRule,
    rightsizing: RightSizingEngine,
    metrics: GuardianMetrics,
    logger: StructuredLogger,
}

impl Guardian {
    pub fn new(detector: IqrDetector, zombie_rule: ZombieRule, logger: StructuredLogger) -> Self {
        Self {
            detector,
            zombie_rule,
            rightsizing: RightSizingEngine::new(),
            metrics: GuardianMetrics::new(),
            logger,
        }
    }

    /// Run anomaly detection over a billing series
    pub fn analyze_billing(&self, series: Vec<CostRecord>) -> BillingAnalysis {
        let start = Instant::now();
        let report = self.detector.detect(&series);
        self.metrics
            .observe_analysis_latency(start.elapsed().as_secs_f64());
        self.metrics.inc_analyses_run();

        self.logger.log_analysis(series.len(), report.threshold, report.anomalies.len());
        for record in &report.anomalies {
            self.metrics.inc_anomalies_detected();
            self.logger.log_cost_anomaly(record, report.threshold);
        }

        BillingAnalysis { series, report }
    }

    /// Classify zombies in an inventory
    pub fn scan_zombies(&self, inventory: &[Resource]) -> ZombieReport {
        let report = self.zombie_rule.scan(inventory);
        self.metrics.set_zombies_detected(report.zombie_ids.len() as i64);
        if report.has_zombies() {
            self.logger.log_zombies(&report.zombie_ids);
        }
        report
    }

    /// Produce right-sizing recommendations
    pub fn recommend(&self, usages: &[InstanceUsage]) -> Vec<OptimizationRecommendation> {
        let recommendations = self.rightsizing.recommend(usages);
        self.metrics
            .set_recommendations_generated(recommendations.len() as i64);
        for rec in &recommendations {
            self.logger.log_recommendation(rec);
        }
        recommendations
    }
}

impl Default for Guardian {
    fn default() -> Self {
        Self::new(
            IqrDetector::default(),
            ZombieRule::default(),
            StructuredLogger::new("finops-guardian"),
        )
    }
}
