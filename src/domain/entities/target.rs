use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::outcome::CheckOutcome;

/// Result of the most recently *completed* check for a target.
///
/// Never reflects an in-flight check: the scheduler only writes a status
/// after the probe invocation has fully resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckStatus {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl CheckStatus {
    /// Stamp an outcome with the current time.
    #[must_use]
    pub fn from_outcome(outcome: CheckOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
            timestamp: Utc::now(),
        }
    }
}

/// A monitored endpoint: an address paired with the probe that checks it.
///
/// `id` is assigned at creation and never reused; `address` and `probe` are
/// immutable for the target's lifetime. `probe` may name a probe that is not
/// loaded — that is tolerated and surfaces as a failing status each cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    // Hand-edited files may omit the id; one is minted on load.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub address: String,
    pub probe: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<CheckStatus>,
}

impl Target {
    /// Create a target with a fresh id and no status yet.
    #[must_use]
    pub fn new(address: impl Into<String>, probe: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            address: address.into(),
            probe: probe.into(),
            last_status: None,
        }
    }
}
