use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::outcome::CheckOutcome;
use crate::domain::ports::probe::Probe;

/// Run one probe invocation in its own task with a hard deadline.
///
/// The spawned task is the isolation boundary: a panicking probe surfaces as
/// a join error here instead of unwinding into the scheduler, and a hanging
/// probe is aborted at the deadline. Every path collapses into a
/// `CheckOutcome` — callers cannot distinguish a probe-reported failure, a
/// crash, and a timeout without inspecting `message`.
///
/// Exactly one task is spawned per call and none outlives the call: the
/// task either completes or is aborted before this function returns.
pub async fn run_probe(probe: Arc<dyn Probe>, address: &str, timeout: Duration) -> CheckOutcome {
    let task = tokio::spawn({
        let address = address.to_string();
        async move { probe.monitor(&address).await }
    });
    let abort = task.abort_handle();

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(outcome))) => outcome,
        Ok(Ok(Err(probe_err))) => CheckOutcome::down(format!("'{address}' - {probe_err}")),
        Ok(Err(join_err)) => CheckOutcome::down(format!("'{address}' - probe crashed: {join_err}")),
        Err(_) => {
            abort.abort();
            CheckOutcome::down(format!("'{address}' timed out after {timeout:?}"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::ports::probe::ProbeError;
    use async_trait::async_trait;

    struct StaticProbe {
        outcome: CheckOutcome,
    }

    #[async_trait]
    impl Probe for StaticProbe {
        fn name(&self) -> &'static str {
            "static"
        }
        fn description(&self) -> &'static str {
            "returns a fixed outcome"
        }
        async fn monitor(&self, _address: &str) -> Result<CheckOutcome, ProbeError> {
            Ok(self.outcome.clone())
        }
    }

    struct ErroringProbe;

    #[async_trait]
    impl Probe for ErroringProbe {
        fn name(&self) -> &'static str {
            "erroring"
        }
        fn description(&self) -> &'static str {
            "always returns a protocol error"
        }
        async fn monitor(&self, _address: &str) -> Result<CheckOutcome, ProbeError> {
            Err(ProbeError::Connection("connection refused".into()))
        }
    }

    struct PanickingProbe;

    #[async_trait]
    impl Probe for PanickingProbe {
        fn name(&self) -> &'static str {
            "panicking"
        }
        fn description(&self) -> &'static str {
            "always panics"
        }
        async fn monitor(&self, _address: &str) -> Result<CheckOutcome, ProbeError> {
            panic!("probe blew up");
        }
    }

    struct HangingProbe;

    #[async_trait]
    impl Probe for HangingProbe {
        fn name(&self) -> &'static str {
            "hanging"
        }
        fn description(&self) -> &'static str {
            "never resolves"
        }
        async fn monitor(&self, _address: &str) -> Result<CheckOutcome, ProbeError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn success_outcome_passes_through() {
        let probe = Arc::new(StaticProbe {
            outcome: CheckOutcome::up("'example.com' - UP"),
        });
        let outcome = run_probe(probe, "example.com", Duration::from_secs(5)).await;
        assert!(outcome.success);
        assert_eq!(outcome.message, "'example.com' - UP");
    }

    #[tokio::test]
    async fn reported_failure_passes_through() {
        let probe = Arc::new(StaticProbe {
            outcome: CheckOutcome::down("'example.com' - DOWN or unreachable"),
        });
        let outcome = run_probe(probe, "example.com", Duration::from_secs(5)).await;
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn probe_error_becomes_failure_outcome() {
        let outcome =
            run_probe(Arc::new(ErroringProbe), "example.com", Duration::from_secs(5)).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("connection refused"));
        assert!(outcome.message.contains("example.com"));
    }

    #[tokio::test]
    async fn panic_becomes_failure_outcome() {
        let outcome =
            run_probe(Arc::new(PanickingProbe), "example.com", Duration::from_secs(5)).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("probe crashed"));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_probe_times_out() {
        let start = tokio::time::Instant::now();
        let outcome =
            run_probe(Arc::new(HangingProbe), "example.com", Duration::from_secs(5)).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("timed out"));
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }
}
