pub mod https;
pub mod minecraft;

use std::sync::Arc;

use crate::domain::ports::probe::Probe;

/// All probes compiled into the binary, in registration order.
///
/// A probe whose underlying client cannot be constructed is skipped with a
/// warning; the remaining probes still load.
#[must_use]
pub fn builtin_probes() -> Vec<Arc<dyn Probe>> {
    let mut probes: Vec<Arc<dyn Probe>> = Vec::new();
    match https::HttpsProbe::new() {
        Ok(probe) => probes.push(Arc::new(probe)),
        Err(e) => tracing::warn!("skipping HTTPS probe: {e}"),
    }
    probes.push(Arc::new(minecraft::MinecraftProbe::new()));
    probes
}
