use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

use super::registry::ProbeRegistry;
use super::runner::run_probe;
use crate::domain::entities::outcome::CheckOutcome;
use crate::domain::ports::store::TargetStore;
use uuid::Uuid;

/// Commands the presentation layer can send to a running scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// Start a cycle immediately. Refused (no-op) while one is running.
    CheckNow,
}

/// Outcome of attempting to start a check cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle ran to completion.
    Completed { checked: usize, failed: usize },
    /// A cycle was already running; nothing was started.
    Refused,
}

#[derive(Debug)]
struct SchedulerState {
    running: AtomicBool,
    seconds_left: AtomicU64,
    targets_total: AtomicUsize,
    targets_done: AtomicUsize,
}

/// Read-only progress view handed to the presentation layer.
#[derive(Clone)]
pub struct SchedulerObserver {
    state: Arc<SchedulerState>,
}

impl SchedulerObserver {
    /// Whether a check cycle is currently in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    /// Countdown (in seconds) until the next periodic cycle starts.
    #[must_use]
    pub fn seconds_until_next_check(&self) -> u64 {
        self.state.seconds_left.load(Ordering::SeqCst)
    }

    /// Number of targets in the current (or last) cycle.
    #[must_use]
    pub fn targets_total(&self) -> usize {
        self.state.targets_total.load(Ordering::SeqCst)
    }

    /// Number of targets whose check has completed in the current cycle.
    #[must_use]
    pub fn targets_done(&self) -> usize {
        self.state.targets_done.load(Ordering::SeqCst)
    }
}

/// Drives periodic check cycles: fan out one isolated probe invocation per
/// target, write each result back as it completes, and refuse overlapping
/// cycles.
///
/// Fan-out is unbounded — one task per target. That mirrors the "check
/// everything at once" semantics the dashboard wants, and is a known
/// scalability limit for very large target lists.
pub struct CheckScheduler {
    store: Arc<dyn TargetStore>,
    registry: Arc<ProbeRegistry>,
    interval_secs: u64,
    probe_timeout: Duration,
    state: Arc<SchedulerState>,
}

impl CheckScheduler {
    #[must_use]
    pub fn new(
        store: Arc<dyn TargetStore>,
        registry: Arc<ProbeRegistry>,
        interval_secs: u64,
        probe_timeout: Duration,
    ) -> Self {
        let interval_secs = interval_secs.max(1);
        Self {
            store,
            registry,
            interval_secs,
            probe_timeout,
            state: Arc::new(SchedulerState {
                running: AtomicBool::new(false),
                seconds_left: AtomicU64::new(interval_secs),
                targets_total: AtomicUsize::new(0),
                targets_done: AtomicUsize::new(0),
            }),
        }
    }

    /// Progress view for the presentation layer.
    #[must_use]
    pub fn observer(&self) -> SchedulerObserver {
        SchedulerObserver {
            state: Arc::clone(&self.state),
        }
    }

    /// Run the countdown loop until shutdown.
    ///
    /// A 1-second tick decrements the countdown; at zero a cycle is launched
    /// on its own task so the loop stays responsive to commands. Ticks that
    /// arrive while a cycle is running are no-ops — the countdown only
    /// resumes once the cycle has returned to idle.
    pub async fn run(
        self: Arc<Self>,
        mut commands: mpsc::UnboundedReceiver<SchedulerCommand>,
        mut shutdown: watch::Receiver<()>,
    ) {
        let mut tick = tokio::time::interval(Duration::from_secs(1));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first interval tick fires immediately; skip it so the countdown
        // starts at the full interval.
        tick.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.changed() => {
                    tracing::info!("scheduler shutting down");
                    break;
                }

                cmd = commands.recv() => match cmd {
                    Some(SchedulerCommand::CheckNow) => Self::spawn_cycle(&self),
                    None => break,
                },

                _ = tick.tick() => {
                    if self.state.running.load(Ordering::SeqCst) {
                        continue;
                    }
                    let left = self
                        .state
                        .seconds_left
                        .load(Ordering::SeqCst)
                        .saturating_sub(1);
                    self.state.seconds_left.store(left, Ordering::SeqCst);
                    if left == 0 {
                        Self::spawn_cycle(&self);
                    }
                }
            }
        }
    }

    fn spawn_cycle(this: &Arc<Self>) {
        let scheduler = Arc::clone(this);
        tokio::spawn(async move {
            scheduler.run_cycle().await;
        });
    }

    /// Run one full check cycle: snapshot the target list, fan out one probe
    /// invocation per target, write each result back as soon as it completes,
    /// and join all of them before returning to idle.
    ///
    /// Refused while another cycle is in flight — cycles never overlap, which
    /// also guarantees `update_status` calls for a single target are strictly
    /// sequential across cycles.
    pub async fn run_cycle(&self) -> CycleOutcome {
        if self
            .state
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("check cycle already in progress, trigger ignored");
            return CycleOutcome::Refused;
        }

        let outcome = self.fan_out().await;

        self.state
            .seconds_left
            .store(self.interval_secs, Ordering::SeqCst);
        self.state.running.store(false, Ordering::SeqCst);
        outcome
    }

    async fn fan_out(&self) -> CycleOutcome {
        let targets = match self.store.snapshot() {
            Ok(targets) => targets,
            Err(e) => {
                tracing::warn!("could not read target list: {e}");
                return CycleOutcome::Completed {
                    checked: 0,
                    failed: 0,
                };
            }
        };

        self.state
            .targets_total
            .store(targets.len(), Ordering::SeqCst);
        self.state.targets_done.store(0, Ordering::SeqCst);
        tracing::info!("checking {} target(s)", targets.len());

        let mut checked = 0usize;
        let mut failed = 0usize;
        let mut tasks: JoinSet<bool> = JoinSet::new();

        for target in targets {
            let Some(probe) = self.registry.find(&target.probe) else {
                // No execution unit for unresolved probes: fail immediately.
                let outcome = CheckOutcome::down(format!("probe '{}' not loaded", target.probe));
                self.write_back(target.id, outcome);
                self.state.targets_done.fetch_add(1, Ordering::SeqCst);
                checked += 1;
                failed += 1;
                continue;
            };

            let store = Arc::clone(&self.store);
            let state = Arc::clone(&self.state);
            let timeout = self.probe_timeout;
            tasks.spawn(async move {
                let outcome = run_probe(probe, &target.address, timeout).await;
                let success = outcome.success;
                if let Err(e) = store.update_status(target.id, outcome) {
                    tracing::warn!("failed to persist result for '{}': {e}", target.address);
                }
                state.targets_done.fetch_add(1, Ordering::SeqCst);
                success
            });
        }

        while let Some(joined) = tasks.join_next().await {
            checked += 1;
            match joined {
                Ok(success) => {
                    if !success {
                        failed += 1;
                    }
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!("check task failed: {e}");
                }
            }
        }

        tracing::info!("cycle complete: {checked} checked, {failed} down");
        CycleOutcome::Completed { checked, failed }
    }

    fn write_back(&self, id: Uuid, outcome: CheckOutcome) {
        if let Err(e) = self.store.update_status(id, outcome) {
            tracing::warn!("failed to persist check result: {e}");
        }
    }
}
