//! Core library for FinOps Guardian
//!
//! This crate provides:
//! - Synthetic billing data generation and CSV export
//! - IQR-based cost anomaly detection
//! - Zombie and right-sizing rules over mock inventory
//! - Spike explanations from a hosted language model
//! - Simulated remediation with explicit session state
//! - Health checks and observability

pub mod analysis;
pub mod anomaly;
pub mod billing;
pub mod explain;
pub mod health;
pub mod hygiene;
pub mod inventory;
pub mod models;
pub mod observability;
pub mod session;

pub use analysis::{BillingAnalysis, Guardian};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{GuardianMetrics, StructuredLogger};
pub use session::{RemediationOutcome, RemediationSession};
