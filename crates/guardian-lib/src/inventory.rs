//! Static mock inventory used by the dashboard

use crate::models::{InstanceUsage, Resource};

/// Incident log attached to explanation requests for the demo spike
pub const MOCK_INCIDENT_LOGS: &str = "\
[LOG 14:00] Auto-scaling group triggered by CPU > 80%.
[LOG 14:05] Scale out: Increased from 2 to 50 instances.
[LOG 14:10] Error: Infinite loop detected in 'video-transcode' job.";

/// Running resources scanned for zombies
pub fn mock_inventory() -> Vec<Resource> {
    vec![
        Resource::running("i-123", 2).with_tag("owner", "dev"),
        Resource::running("i-456", 5).with_tag("owner", "test"),
        Resource::running("i-999", 48),
    ]
}

/// Instances with utilization metrics for right-sizing
pub fn mock_instance_usage() -> Vec<InstanceUsage> {
    vec![
        InstanceUsage::new("i-1", "t3.micro", 80.0, 10.0),
        InstanceUsage::new("i-2", "m5.4xlarge", 2.0, 500.0),
        InstanceUsage::new("i-3", "c5.large", 5.0, 85.0),
    ]
}
