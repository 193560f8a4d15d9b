use std::sync::Arc;

use crate::domain::ports::probe::Probe;

/// Name-indexed registry of the loaded probe capabilities.
///
/// Populated once at startup from a static registration table and immutable
/// for the process lifetime. Lookups never fail loudly: an unknown name
/// returns `None` so callers can produce a structured "not loaded" outcome
/// instead of aborting a check cycle.
pub struct ProbeRegistry {
    probes: Vec<Arc<dyn Probe>>,
}

impl ProbeRegistry {
    /// Build a registry from the given probes. A probe whose name collides
    /// with an earlier registration is skipped with a warning — first one
    /// wins.
    #[must_use]
    pub fn new(probes: Vec<Arc<dyn Probe>>) -> Self {
        let mut registered: Vec<Arc<dyn Probe>> = Vec::with_capacity(probes.len());
        for probe in probes {
            if registered.iter().any(|p| p.name() == probe.name()) {
                tracing::warn!("duplicate probe name '{}', skipping", probe.name());
                continue;
            }
            tracing::info!("loaded probe: {}", probe.name());
            registered.push(probe);
        }
        Self { probes: registered }
    }

    /// Look up a probe by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Arc<dyn Probe>> {
        self.probes.iter().find(|p| p.name() == name).cloned()
    }

    /// All registered probes, in registration order.
    #[must_use]
    pub fn probes(&self) -> &[Arc<dyn Probe>] {
        &self.probes
    }

    /// Registered probe names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::outcome::CheckOutcome;
    use crate::domain::ports::probe::ProbeError;
    use async_trait::async_trait;

    struct NamedProbe {
        name: &'static str,
    }

    #[async_trait]
    impl Probe for NamedProbe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "test probe"
        }

        async fn monitor(&self, _address: &str) -> Result<CheckOutcome, ProbeError> {
            Ok(CheckOutcome::up("ok"))
        }
    }

    #[test]
    fn find_returns_registered_probe() {
        let registry = ProbeRegistry::new(vec![
            Arc::new(NamedProbe { name: "HTTPS" }),
            Arc::new(NamedProbe { name: "Minecraft" }),
        ]);

        let probe = registry.find("Minecraft").expect("probe registered");
        assert_eq!(probe.name(), "Minecraft");
    }

    #[test]
    fn find_unknown_name_returns_none() {
        let registry = ProbeRegistry::new(vec![Arc::new(NamedProbe { name: "HTTPS" })]);
        assert!(registry.find("DoesNotExist").is_none());
    }

    #[test]
    fn duplicate_names_first_wins() {
        let registry = ProbeRegistry::new(vec![
            Arc::new(NamedProbe { name: "HTTPS" }),
            Arc::new(NamedProbe { name: "HTTPS" }),
        ]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn names_in_registration_order() {
        let registry = ProbeRegistry::new(vec![
            Arc::new(NamedProbe { name: "HTTPS" }),
            Arc::new(NamedProbe { name: "Minecraft" }),
        ]);
        assert_eq!(registry.names(), vec!["HTTPS", "Minecraft"]);
    }

    #[test]
    fn empty_registry() {
        let registry = ProbeRegistry::new(vec![]);
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.find("HTTPS").is_none());
    }
}
