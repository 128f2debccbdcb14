//! Right-sizing recommendations
//!
//! Rules are evaluated in priority order and the first match wins:
//! 1. Large instance (type name contains the size marker) with low CPU
//!    is over-provisioned; downsizing saves a fixed share of its cost.
//! 2. Any instance with near-zero CPU is idle and should be scheduled off.

use crate::models::{InstanceUsage, IssueKind, OptimizationRecommendation, Savings};

/// Substring that marks an instance type as large
const LARGE_TYPE_MARKER: &str = "xlarge";

/// CPU percentage below which a large instance is over-provisioned
const OVER_PROVISIONED_CPU_PERCENT: f64 = 10.0;

/// CPU percentage below which any instance is idle
const IDLE_CPU_PERCENT: f64 = 3.0;

/// Share of current cost saved by downsizing
const DOWNSIZE_SAVINGS_RATIO: f64 = 0.5;

/// Heuristic right-sizing rule engine
#[derive(Debug, Clone)]
pub struct RightSizingEngine {
    pub large_type_marker: String,
    pub over_provisioned_cpu_percent: f64,
    pub idle_cpu_percent: f64,
    pub downsize_savings_ratio: f64,
}

impl RightSizingEngine {
    pub fn new() -> Self {
        Self {
            large_type_marker: LARGE_TYPE_MARKER.to_string(),
            over_provisioned_cpu_percent: OVER_PROVISIONED_CPU_PERCENT,
            idle_cpu_percent: IDLE_CPU_PERCENT,
            downsize_savings_ratio: DOWNSIZE_SAVINGS_RATIO,
        }
    }

    /// Evaluate one instance; at most one recommendation
    pub fn evaluate(&self, usage: &InstanceUsage) -> Option<OptimizationRecommendation> {
        if usage.instance_type.contains(&self.large_type_marker)
            && usage.cpu_avg_percent < self.over_provisioned_cpu_percent
        {
            return Some(OptimizationRecommendation {
                resource_id: usage.id.clone(),
                issue: IssueKind::OverProvisioned,
                action: format!("Downsize from {} to Medium", usage.instance_type),
                estimated_savings: Savings::Amount(
                    usage.monthly_cost * self.downsize_savings_ratio,
                ),
            });
        }

        if usage.cpu_avg_percent < self.idle_cpu_percent {
            return Some(OptimizationRecommendation {
                resource_id: usage.id.clone(),
                issue: IssueKind::Idle,
                action: "Turn off at Night/Weekends".to_string(),
                estimated_savings: Savings::Variable,
            });
        }

        None
    }

    /// Evaluate every instance, preserving input order
    pub fn recommend(&self, usages: &[InstanceUsage]) -> Vec<OptimizationRecommendation> {
        usages.iter().filter_map(|u| self.evaluate(u)).collect()
    }
}

impl Default for RightSizingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::mock_instance_usage;

    #[test]
    fn test_large_low_cpu_is_over_provisioned() {
        let engine = RightSizingEngine::new();
        let rec = engine
            .evaluate(&InstanceUsage::new("i-2", "m5.4xlarge", 5.0, 500.0))
            .unwrap();

        assert_eq!(rec.issue, IssueKind::OverProvisioned);
        assert_eq!(rec.estimated_savings, Savings::Amount(250.0));
        assert_eq!(rec.action, "Downsize from m5.4xlarge to Medium");
    }

    #[test]
    fn test_busy_small_instance_has_no_recommendation() {
        let engine = RightSizingEngine::new();
        assert!(engine
            .evaluate(&InstanceUsage::new("i-1", "t3.micro", 80.0, 10.0))
            .is_none());
    }

    #[test]
    fn test_over_provisioned_wins_over_idle() {
        let engine = RightSizingEngine::new();
        let recs = engine.recommend(&[InstanceUsage::new("i-2", "m5.4xlarge", 2.0, 500.0)]);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].issue, IssueKind::OverProvisioned);
        assert_eq!(recs[0].estimated_savings, Savings::Amount(250.0));
    }

    #[test]
    fn test_near_zero_cpu_small_instance_is_idle() {
        let engine = RightSizingEngine::new();
        let rec = engine
            .evaluate(&InstanceUsage::new("i-9", "t3.small", 1.0, 20.0))
            .unwrap();

        assert_eq!(rec.issue, IssueKind::Idle);
        assert_eq!(rec.estimated_savings, Savings::Variable);
        assert_eq!(rec.action, "Turn off at Night/Weekends");
    }

    #[test]
    fn test_plain_large_is_not_matched_by_marker() {
        // "c5.large" does not contain "xlarge"; 5% CPU is above the idle cut.
        let engine = RightSizingEngine::new();
        assert!(engine
            .evaluate(&InstanceUsage::new("i-3", "c5.large", 5.0, 85.0))
            .is_none());
    }

    #[test]
    fn test_mock_usage_recommendations() {
        let recs = RightSizingEngine::new().recommend(&mock_instance_usage());

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].resource_id, "i-2");
    }

    #[test]
    fn test_empty_input() {
        assert!(RightSizingEngine::new().recommend(&[]).is_empty());
    }
}
