//! Settings for the `[sync]` configuration table.

use serde::{Deserialize, Serialize};

/// What a failed conversion does to the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and keep going.
    #[default]
    Report,
    /// Stop scheduling new work and fail the run once in-flight jobs finish.
    Abort,
}

/// Run-wide behavior switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub conversion_failures: FailurePolicy,
    /// Re-hash copied videos and compare against the source.
    #[serde(default)]
    pub verify_copies: bool,
}

impl SyncSettings {
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.conversion_failures = policy;
        self
    }

    pub fn with_verify_copies(mut self, verify: bool) -> Self {
        self.verify_copies = verify;
        self
    }

    pub fn aborts_on_failure(&self) -> bool {
        self.conversion_failures == FailurePolicy::Abort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SyncSettings::default();
        assert_eq!(settings.conversion_failures, FailurePolicy::Report);
        assert!(!settings.verify_copies);
        assert!(!settings.aborts_on_failure());
    }

    #[test]
    fn test_policy_serialization() {
        assert_eq!(
            serde_json::to_string(&FailurePolicy::Abort).unwrap(),
            "\"abort\""
        );
        let parsed: FailurePolicy = serde_json::from_str("\"report\"").unwrap();
        assert_eq!(parsed, FailurePolicy::Report);
    }

    #[test]
    fn test_builders() {
        let settings = SyncSettings::default()
            .with_failure_policy(FailurePolicy::Abort)
            .with_verify_copies(true);
        assert!(settings.aborts_on_failure());
        assert!(settings.verify_copies);
    }
}
