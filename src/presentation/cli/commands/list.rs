use colored::Colorize;

use crate::domain::entities::target::Target;
use crate::domain::ports::store::TargetStore;

/// Prints the registered targets and their last known status.
///
/// # Errors
///
/// Returns an error if the target list cannot be read or JSON serialization
/// fails.
pub fn run_list(store: &dyn TargetStore, json: bool) -> anyhow::Result<()> {
    let targets = store.snapshot()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&targets)?);
        return Ok(());
    }

    if targets.is_empty() {
        println!("{}", "No targets registered.".dimmed());
        return Ok(());
    }

    for target in &targets {
        print_target(target);
    }
    Ok(())
}

fn print_target(target: &Target) {
    let (state, detail) = match &target.last_status {
        Some(status) if status.success => (
            "UP".green().bold(),
            format!("last checked {}", status.timestamp.format("%Y-%m-%d %H:%M:%S")),
        ),
        Some(status) => (
            "DOWN".red().bold(),
            format!("last checked {}", status.timestamp.format("%Y-%m-%d %H:%M:%S")),
        ),
        None => ("?".dimmed().bold(), "never checked".to_string()),
    };
    println!(
        "{state:>6}  {} [{}]  {}",
        target.address.bold(),
        target.probe,
        detail.dimmed()
    );
}
