use colored::Colorize;

use crate::application::services::registry::ProbeRegistry;

/// Prints the available probes and what they monitor.
pub fn run_probes(registry: &ProbeRegistry) {
    if registry.is_empty() {
        println!("{}", "No probes loaded.".dimmed());
        return;
    }

    for probe in registry.probes() {
        println!("{:>12}  {}", probe.name().bold(), probe.description());
    }
}
