//! CLI command implementations

pub mod billing;
pub mod hygiene;
pub mod report;
