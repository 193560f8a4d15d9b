use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::outcome::CheckOutcome;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A pluggable liveness check for one class of endpoint.
///
/// Implementations must not enforce their own time limit — every invocation
/// is wrapped in a single caller-imposed deadline by the probe runner.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Registry key, matched against `Target::probe`.
    fn name(&self) -> &'static str;

    /// One-line description shown in probe listings.
    fn description(&self) -> &'static str;

    /// Check one address and report pass/fail with a human-readable message.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError` for faults below the protocol level (bad address,
    /// connection failure, unparsable response). A reachable endpoint that is
    /// merely unhealthy is a `CheckOutcome` with `success: false`, not an
    /// error.
    async fn monitor(&self, address: &str) -> Result<CheckOutcome, ProbeError>;
}
