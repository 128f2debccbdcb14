//! Resource hygiene rules
//!
//! Two independent rule sets over mock inventory:
//! - Zombie detection (long-idle resources nobody owns)
//! - Right-sizing (over-provisioned or idle instances)

mod rightsizing;
mod zombie;

pub use rightsizing::RightSizingEngine;
pub use zombie::{ZombieReport, ZombieRule};
