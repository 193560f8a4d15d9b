use colored::Colorize;

use crate::application::services::registry::ProbeRegistry;
use crate::domain::entities::target::Target;
use crate::domain::ports::store::TargetStore;

/// Registers a new target and persists it.
///
/// An unknown probe name is accepted with a warning; the target will fail
/// its checks until a probe by that name is available.
///
/// # Errors
///
/// Returns an error if the address is empty or the target cannot be saved.
pub fn run_add(
    store: &dyn TargetStore,
    registry: &ProbeRegistry,
    address: &str,
    probe: &str,
) -> anyhow::Result<()> {
    let address = address.trim();
    let probe = probe.trim();
    if address.is_empty() {
        anyhow::bail!("address must not be empty");
    }

    if registry.find(probe).is_none() {
        eprintln!(
            "{} probe '{probe}' is not loaded; the target will fail its checks",
            "warning:".yellow().bold()
        );
    }

    store.append(Target::new(address, probe))?;
    println!("Added {} [{probe}]", address.bold());
    Ok(())
}
