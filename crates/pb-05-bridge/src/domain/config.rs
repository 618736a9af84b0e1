//! Orchestrator tuning.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};

use super::errors::{BridgeError, BridgeResult};

/// Receipt polling and fan-out limits.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrchestratorConfig {
    /// Budget for one receipt wait.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub receipt_timeout: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub poll_interval: Duration,
    /// Upper bound on legs in flight at once.
    pub max_concurrent_legs: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            receipt_timeout: Duration::from_secs(50),
            poll_interval: Duration::from_millis(50),
            max_concurrent_legs: 32,
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> BridgeResult<()> {
        if self.max_concurrent_legs == 0 {
            return Err(BridgeError::InvalidConfig(
                "maxConcurrentLegs must be at least 1".into(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(BridgeError::InvalidConfig("pollInterval must be non-zero".into()));
        }
        if self.receipt_timeout < self.poll_interval {
            return Err(BridgeError::InvalidConfig(
                "receiptTimeout must be at least one pollInterval".into(),
            ));
        }
        Ok(())
    }
}
