//! IQR cost spike detection
//!
//! Computes Q1 and Q3 of a cost series with linear-interpolation quantiles
//! and flags every record strictly above `Q3 + multiplier * IQR`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::CostRecord;

/// Tukey fence multiplier used by the dashboard
const DEFAULT_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Error, PartialEq)]
pub enum DetectorError {
    #[error("invalid IQR multiplier {0}: must be positive and finite")]
    InvalidMultiplier(f64),
}

/// Detects cost spikes above the upper IQR fence
#[derive(Debug, Clone, Copy)]
pub struct IqrDetector {
    multiplier: f64,
}

impl IqrDetector {
    /// Create a detector with a custom fence multiplier
    pub fn new(multiplier: f64) -> Result<Self, DetectorError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(DetectorError::InvalidMultiplier(multiplier));
        }
        Ok(Self { multiplier })
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Run detection over a chronologically ordered series
    ///
    /// Never fails: an empty series produces an empty report with a zero
    /// threshold, a constant series produces a threshold equal to the
    /// constant and no anomalies.
    pub fn detect(&self, series: &[CostRecord]) -> AnomalyReport {
        let mut costs: Vec<f64> = series.iter().map(|r| r.cost).collect();
        costs.sort_by(f64::total_cmp);

        let (q1, q3) = match (quantile(&costs, 0.25), quantile(&costs, 0.75)) {
            (Some(q1), Some(q3)) => (q1, q3),
            _ => return AnomalyReport::empty(),
        };

        let iqr = q3 - q1;
        let threshold = q3 + self.multiplier * iqr;

        let anomalies: Vec<CostRecord> = series
            .iter()
            .filter(|r| r.cost > threshold)
            .cloned()
            .collect();

        tracing::debug!(
            samples = series.len(),
            q1 = q1,
            q3 = q3,
            threshold = threshold,
            flagged = anomalies.len(),
            "IQR detection complete"
        );

        AnomalyReport {
            threshold,
            q1,
            q3,
            iqr,
            sample_count: series.len(),
            anomalies,
        }
    }
}

impl Default for IqrDetector {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

/// Linear-interpolation quantile over already sorted values
///
/// Uses position `q * (n - 1)` and interpolates between its neighbours.
/// Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Result of one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Upper fence; records strictly above it are anomalies
    pub threshold: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub sample_count: usize,
    /// Flagged records in original order
    pub anomalies: Vec<CostRecord>,
}

impl AnomalyReport {
    fn empty() -> Self {
        Self {
            threshold: 0.0,
            q1: 0.0,
            q3: 0.0,
            iqr: 0.0,
            sample_count: 0,
            anomalies: Vec::new(),
        }
    }

    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }

    /// Most recent flagged record, the one sent for explanation
    pub fn latest(&self) -> Option<&CostRecord> {
        self.anomalies.last()
    }

    /// Mean cost of the records that were not flagged
    pub fn baseline_cost(&self, series: &[CostRecord]) -> Option<f64> {
        let normal: Vec<f64> = series
            .iter()
            .filter(|r| r.cost <= self.threshold)
            .map(|r| r.cost)
            .collect();
        if normal.is_empty() {
            return None;
        }
        Some(normal.iter().sum::<f64>() / normal.len() as f64)
    }

    /// Percentage of a record's cost above the baseline
    pub fn percentage_above_baseline(&self, record: &CostRecord, baseline: f64) -> f64 {
        if baseline < f64::EPSILON {
            return 0.0;
        }
        ((record.cost - baseline) / baseline) * 100.0
    }
}
