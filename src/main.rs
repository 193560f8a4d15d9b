use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use lookout::application::config::AppConfig;
use lookout::application::services::registry::ProbeRegistry;
use lookout::application::services::scheduler::{CheckScheduler, SchedulerCommand};
use lookout::domain::ports::store::TargetStore;
use lookout::infrastructure::persistence::yaml_store::YamlStore;
use lookout::infrastructure::probes::builtin_probes;
use lookout::presentation::cli::app::{Cli, Commands};
use lookout::presentation::cli::commands::add::run_add;
use lookout::presentation::cli::commands::check::run_check;
use lookout::presentation::cli::commands::list::run_list;
use lookout::presentation::cli::commands::probes::run_probes;
use lookout::presentation::tui::app::run_tui;
use lookout::presentation::tui::logs::{CapturingLayer, LogBuffer};

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn setup_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .init();
}

/// In dashboard mode log lines go to an in-memory buffer rendered by the
/// TUI; writing them to stdout would corrupt the alternate screen.
fn setup_tui_tracing(verbose: bool) -> LogBuffer {
    let logs = LogBuffer::new();
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(CapturingLayer::new(logs.clone()))
        .init();
    logs
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };

    // Manual DI — main.rs is the only place that knows concrete types
    let store: Arc<dyn TargetStore> = Arc::new(YamlStore::open(&config.state.path));
    let registry = Arc::new(ProbeRegistry::new(builtin_probes()));
    let probe_timeout = Duration::from_secs(config.general.probe_timeout_secs);

    match cli.command {
        Some(Commands::Check { json }) => {
            setup_tracing(cli.verbose);
            let scheduler = CheckScheduler::new(
                Arc::clone(&store),
                Arc::clone(&registry),
                config.general.interval_secs,
                probe_timeout,
            );
            let failed = run_check(&scheduler, store.as_ref(), json).await?;
            if failed > 0 {
                std::process::exit(1);
            }
        }
        Some(Commands::Add { address, probe }) => {
            setup_tracing(cli.verbose);
            run_add(store.as_ref(), &registry, &address, &probe)?;
        }
        Some(Commands::List { json }) => {
            setup_tracing(cli.verbose);
            run_list(store.as_ref(), json)?;
        }
        Some(Commands::Probes) => {
            setup_tracing(cli.verbose);
            run_probes(&registry);
        }
        command @ (Some(Commands::Watch { .. }) | None) => {
            let interval = match command {
                Some(Commands::Watch { interval }) => interval,
                _ => None,
            };
            let logs = setup_tui_tracing(cli.verbose);
            let interval_secs = interval.unwrap_or(config.general.interval_secs);

            let scheduler = Arc::new(CheckScheduler::new(
                Arc::clone(&store),
                Arc::clone(&registry),
                interval_secs,
                probe_timeout,
            ));
            let observer = scheduler.observer();

            let (commands, command_rx) = tokio::sync::mpsc::unbounded_channel();
            let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(());
            let scheduler_task = tokio::spawn(Arc::clone(&scheduler).run(command_rx, shutdown_rx));

            // Kick off the first cycle right away instead of waiting a full
            // interval.
            let _ = commands.send(SchedulerCommand::CheckNow);

            let result = run_tui(
                Arc::clone(&store),
                Arc::clone(&registry),
                observer,
                commands,
                logs,
            );

            let _ = shutdown_tx.send(());
            let _ = scheduler_task.await;
            result?;
        }
    }

    Ok(())
}
