//! Simulated remediation with explicit per-session state
//!
//! The "already remediated" flag lives in a [`RemediationSession`] value
//! that callers pass in and get back, so no handler keeps hidden state.

use serde::{Deserialize, Serialize};

/// Per-session remediation flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationSession {
    pub remediated: bool,
}

/// What a remediation attempt did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemediationOutcome {
    /// Instances were (simulated) stopped
    Stopped { resource_ids: Vec<String> },
    /// This session already ran remediation
    AlreadyRemediated,
    /// No zombies were supplied
    NothingToRemediate,
}

impl RemediationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate stopping the given zombie instances
    ///
    /// Returns the next session state together with the outcome. The flag
    /// only flips when something was actually stopped.
    pub fn remediate(self, zombie_ids: &[String]) -> (Self, RemediationOutcome) {
        if self.remediated {
            return (self, RemediationOutcome::AlreadyRemediated);
        }
        if zombie_ids.is_empty() {
            return (self, RemediationOutcome::NothingToRemediate);
        }

        (
            Self { remediated: true },
            RemediationOutcome::Stopped {
                resource_ids: zombie_ids.to_vec(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<String> {
        vec!["i-999".to_string()]
    }

    #[test]
    fn test_first_remediation_stops_zombies() {
        let (session, outcome) = RemediationSession::new().remediate(&ids());

        assert!(session.remediated);
        assert_eq!(
            outcome,
            RemediationOutcome::Stopped {
                resource_ids: ids()
            }
        );
    }

    #[test]
    fn test_second_remediation_is_noop() {
        let (session, _) = RemediationSession::new().remediate(&ids());
        let (session, outcome) = session.remediate(&ids());

        assert!(session.remediated);
        assert_eq!(outcome, RemediationOutcome::AlreadyRemediated);
    }

    #[test]
    fn test_empty_zombie_list_keeps_flag() {
        let (session, outcome) = RemediationSession::new().remediate(&[]);

        assert!(!session.remediated);
        assert_eq!(outcome, RemediationOutcome::NothingToRemediate);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(RemediationOutcome::AlreadyRemediated).unwrap();
        assert_eq!(json["status"], "already_remediated");
    }
}
