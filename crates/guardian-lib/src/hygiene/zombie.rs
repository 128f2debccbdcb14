//! Zombie resource detection
//!
//! A zombie is a resource idle for longer than the threshold that carries
//! no tags at all, so nobody can be identified as its owner.

use serde::{Deserialize, Serialize};

use crate::models::Resource;

/// Default idle threshold (one day)
const DEFAULT_IDLE_HOURS: u32 = 24;

/// Flags untagged resources idle beyond a threshold
#[derive(Debug, Clone, Copy)]
pub struct ZombieRule {
    /// Resources idle strictly longer than this are candidates
    pub idle_hours_threshold: u32,
}

impl ZombieRule {
    pub fn new(idle_hours_threshold: u32) -> Self {
        Self {
            idle_hours_threshold,
        }
    }

    pub fn is_zombie(&self, resource: &Resource) -> bool {
        resource.idle_hours > self.idle_hours_threshold && resource.tags.is_empty()
    }

    /// Scan an inventory, keeping the full list for display
    pub fn scan(&self, inventory: &[Resource]) -> ZombieReport {
        let zombie_ids = inventory
            .iter()
            .filter(|r| self.is_zombie(r))
            .map(|r| r.id.clone())
            .collect();

        ZombieReport {
            inventory: inventory.to_vec(),
            zombie_ids,
        }
    }
}

impl Default for ZombieRule {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_HOURS)
    }
}

/// Inventory plus the ids classified as zombies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZombieReport {
    pub inventory: Vec<Resource>,
    pub zombie_ids: Vec<String>,
}

impl ZombieReport {
    pub fn has_zombies(&self) -> bool {
        !self.zombie_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::mock_inventory;

    #[test]
    fn test_untagged_idle_resource_is_zombie() {
        let rule = ZombieRule::default();
        assert!(rule.is_zombie(&Resource::running("i-999", 48)));
    }

    #[test]
    fn test_tagged_idle_resource_is_not_zombie() {
        let rule = ZombieRule::default();
        let resource = Resource::running("i-999", 48).with_tag("owner", "x");
        assert!(!rule.is_zombie(&resource));
    }

    #[test]
    fn test_idle_threshold_is_exclusive() {
        let rule = ZombieRule::default();
        assert!(!rule.is_zombie(&Resource::running("i-1", 24)));
        assert!(rule.is_zombie(&Resource::running("i-1", 25)));
    }

    #[test]
    fn test_scan_mock_inventory() {
        let inventory = mock_inventory();
        let report = ZombieRule::default().scan(&inventory);

        assert_eq!(report.zombie_ids, vec!["i-999".to_string()]);
        assert_eq!(report.inventory, inventory);
        assert!(report.has_zombies());
    }

    #[test]
    fn test_scan_empty_inventory() {
        let report = ZombieRule::default().scan(&[]);
        assert!(report.inventory.is_empty());
        assert!(!report.has_zombies());
    }

    #[test]
    fn test_custom_threshold() {
        let rule = ZombieRule::new(4);
        let report = rule.scan(&[Resource::running("a", 5), Resource::running("b", 3)]);
        assert_eq!(report.zombie_ids, vec!["a".to_string()]);
    }
}
