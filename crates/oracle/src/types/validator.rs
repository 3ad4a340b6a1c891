//! Validator oracle status.

use serde::{Deserialize, Serialize};

/// A validator's standing in the oracle system.
///
/// Only active validators are eligible for committee selection. A validator
/// that accumulates enough consecutive missed report obligations is
/// deactivated and must explicitly re-activate after the penalty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidatorStatus {
    /// Whether the validator is eligible for selection.
    pub is_active: bool,
    /// Unix time of the most recent activation or deactivation.
    pub since: u64,
    /// Requested-but-unreported obligations missed in a row.
    pub consecutive_misses: u64,
}

impl ValidatorStatus {
    /// An active status starting at `since`.
    pub fn active(since: u64) -> Self {
        Self {
            is_active: true,
            since,
            consecutive_misses: 0,
        }
    }

    /// An inactive status starting at `since`.
    pub fn inactive(since: u64) -> Self {
        Self {
            is_active: false,
            since,
            consecutive_misses: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_inactive() {
        let status = ValidatorStatus::default();
        assert!(!status.is_active);
        assert_eq!(status.since, 0);
        assert_eq!(status.consecutive_misses, 0);
    }

    #[test]
    fn test_constructors() {
        assert!(ValidatorStatus::active(10).is_active);
        assert!(!ValidatorStatus::inactive(10).is_active);
        assert_eq!(ValidatorStatus::active(10).since, 10);
    }
}
