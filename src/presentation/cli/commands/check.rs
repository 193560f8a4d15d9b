use colored::Colorize;

use crate::application::services::scheduler::{CheckScheduler, CycleOutcome};
use crate::domain::entities::target::Target;
use crate::domain::ports::store::TargetStore;

/// Runs one check cycle and prints every target's result.
///
/// Returns the number of targets that are down, so the caller can set
/// the process exit code.
///
/// # Errors
///
/// Returns an error if the target list cannot be read afterwards or JSON
/// serialization fails.
pub async fn run_check(
    scheduler: &CheckScheduler,
    store: &dyn TargetStore,
    json: bool,
) -> anyhow::Result<usize> {
    let outcome = scheduler.run_cycle().await;
    let failed = match outcome {
        CycleOutcome::Completed { failed, .. } => failed,
        // One-shot runs own the scheduler, nothing else can hold the cycle.
        CycleOutcome::Refused => anyhow::bail!("a check cycle is already running"),
    };

    let targets = store.snapshot()?;
    if json {
        print_targets_json(&targets)?;
    } else {
        print_targets_human(&targets);
    }

    Ok(failed)
}

fn print_targets_json(targets: &[Target]) -> anyhow::Result<()> {
    let output = serde_json::to_string_pretty(targets)?;
    println!("{output}");
    Ok(())
}

fn print_targets_human(targets: &[Target]) {
    if targets.is_empty() {
        println!("{}", "No targets registered.".dimmed());
        return;
    }

    for target in targets {
        let (state, message) = match &target.last_status {
            Some(status) if status.success => ("UP".green().bold(), status.message.clone()),
            Some(status) => ("DOWN".red().bold(), status.message.clone()),
            None => ("?".dimmed().bold(), "not checked".to_string()),
        };
        println!(
            "{state:>6}  {} [{}]  {}",
            target.address.bold(),
            target.probe,
            message.replace('\n', " | ").dimmed()
        );
    }
}
