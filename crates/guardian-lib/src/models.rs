//! Core data models for FinOps Guardian

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day of billed cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub date: NaiveDate,
    pub cost: f64,
}

impl CostRecord {
    pub fn new(date: NaiveDate, cost: f64) -> Self {
        Self { date, cost }
    }
}

/// Lifecycle state of a mock cloud resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    Running,
    Stopped,
    Terminated,
}

impl std::fmt::Display for ResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceState::Running => write!(f, "running"),
            ResourceState::Stopped => write!(f, "stopped"),
            ResourceState::Terminated => write!(f, "terminated"),
        }
    }
}

/// Inventory entry scanned by the zombie rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub state: ResourceState,
    pub idle_hours: u32,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Resource {
    /// Create a running resource with no tags
    pub fn running(id: impl Into<String>, idle_hours: u32) -> Self {
        Self {
            id: id.into(),
            state: ResourceState::Running,
            idle_hours,
            tags: BTreeMap::new(),
        }
    }

    /// Attach a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Instance sizing and utilization, input to the right-sizing rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceUsage {
    pub id: String,
    pub instance_type: String,
    /// Average CPU utilization in percent (0-100)
    pub cpu_avg_percent: f64,
    /// Current monthly cost in USD
    pub monthly_cost: f64,
}

impl InstanceUsage {
    pub fn new(
        id: impl Into<String>,
        instance_type: impl Into<String>,
        cpu_avg_percent: f64,
        monthly_cost: f64,
    ) -> Self {
        Self {
            id: id.into(),
            instance_type: instance_type.into(),
            cpu_avg_percent,
            monthly_cost,
        }
    }
}

/// Issue found by the right-sizing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    OverProvisioned,
    Idle,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::OverProvisioned => write!(f, "Over-provisioned (Lazy Server)"),
            IssueKind::Idle => write!(f, "Ideally Idle"),
        }
    }
}

/// Estimated monthly savings of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum Savings {
    /// Fixed amount in USD per month
    Amount(f64),
    /// Depends on how the schedule is applied
    Variable,
}

impl Savings {
    /// Amount in USD, if known
    pub fn amount(&self) -> Option<f64> {
        match self {
            Savings::Amount(v) => Some(*v),
            Savings::Variable => None,
        }
    }
}

impl std::fmt::Display for Savings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Savings::Amount(v) => write!(f, "${:.2}/mo", v),
            Savings::Variable => write!(f, "variable"),
        }
    }
}

/// Right-sizing recommendation for one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecommendation {
    pub resource_id: String,
    pub issue: IssueKind,
    pub action: String,
    pub estimated_savings: Savings,
}
