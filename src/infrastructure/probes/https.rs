use std::time::Instant;

use async_trait::async_trait;

use crate::domain::entities::outcome::CheckOutcome;
use crate::domain::ports::probe::{Probe, ProbeError};

/// Liveness probe for HTTPS services: one HEAD request per check.
///
/// The client carries no request timeout of its own; the orchestrator aborts
/// slow checks from the outside.
pub struct HttpsProbe {
    client: reqwest::Client,
}

impl HttpsProbe {
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

/// Prepend `https://` unless the address already carries an http(s) scheme.
fn normalize(address: &str) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("https://{address}")
    }
}

#[async_trait]
impl Probe for HttpsProbe {
    fn name(&self) -> &'static str {
        "HTTPS"
    }

    fn description(&self) -> &'static str {
        "Monitor HTTPS services."
    }

    async fn monitor(&self, address: &str) -> Result<CheckOutcome, ProbeError> {
        let url = normalize(address);
        let started = Instant::now();

        match self.client.head(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let elapsed = started.elapsed().as_millis();
                Ok(CheckOutcome::up(format!(
                    "'{address}' - UP (Status: {}, Time: {elapsed}ms)",
                    response.status().as_u16()
                )))
            }
            Ok(_) | Err(_) => Ok(CheckOutcome::down(format!(
                "'{address}' - DOWN or Unreachable."
            ))),
        }
    }
}
