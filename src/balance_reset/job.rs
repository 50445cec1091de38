//! Balance reset job
//!
//! Background worker that runs [`ResetEngine::reset_all`] on a fixed cadence
//! and whenever [`ResetJobHandle::run_now`] is called.
//!
//! All resets run on the single worker task, one after another. A `run_now`
//! arriving while a reset is executing leaves one pending run behind; further
//! requests before that run starts are absorbed into it. After every run the
//! periodic timer starts over, so a manual run postpones the next scheduled one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use super::engine::ResetEngine;

/// Configuration for the reset job
#[derive(Debug, Clone)]
pub struct ResetJobConfig {
    /// Time between scheduled resets
    pub interval: Duration,
    /// When false only `run_now` starts a reset
    pub scheduled: bool,
}

impl Default for ResetJobConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10 * 60),
            scheduled: true,
        }
    }
}

pub struct BalanceResetJob {
    engine: Arc<ResetEngine>,
    config: ResetJobConfig,
}

#[derive(Default)]
struct Counters {
    completed: AtomicU64,
    failed: AtomicU64,
}

impl BalanceResetJob {
    pub fn new(engine: Arc<ResetEngine>, config: ResetJobConfig) -> Self {
        Self { engine, config }
    }

    /// Start the worker on the current tokio runtime.
    pub fn spawn(self) -> ResetJobHandle {
        let trigger = Arc::new(Notify::new());
        let counters = Arc::new(Counters::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            interval_secs = self.config.interval.as_secs(),
            scheduled = self.config.scheduled,
            "Starting balance reset job"
        );

        let task = tokio::spawn(self.run(trigger.clone(), counters.clone(), shutdown_rx));

        ResetJobHandle {
            trigger,
            counters,
            shutdown: shutdown_tx,
            task: Mutex::new(Some(task)),
        }
    }

    async fn run(
        self,
        trigger: Arc<Notify>,
        counters: Arc<Counters>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;
        let scheduled = self.config.scheduled;

        loop {
            let cause = tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = trigger.notified() => "manual",
                _ = ticker.tick(), if scheduled => "scheduled",
            };

            match self.engine.reset_all().await {
                Ok(accounts) => {
                    counters.completed.fetch_add(1, Ordering::SeqCst);
                    info!(cause, accounts, "Balance reset run finished");
                }
                Err(e) => {
                    counters.failed.fetch_add(1, Ordering::SeqCst);
                    error!(cause, error = %e, "Balance reset run failed");
                }
            }
            ticker.reset();
        }

        info!("Balance reset job stopped");
    }
}

/// Control handle for a running [`BalanceResetJob`].
pub struct ResetJobHandle {
    trigger: Arc<Notify>,
    counters: Arc<Counters>,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ResetJobHandle {
    /// Request a reset as soon as the worker is free. Returns immediately.
    pub fn run_now(&self) {
        self.trigger.notify_one();
    }

    /// Number of resets that committed successfully.
    pub fn completed_runs(&self) -> u64 {
        self.counters.completed.load(Ordering::SeqCst)
    }

    /// Number of resets that failed.
    pub fn failed_runs(&self) -> u64 {
        self.counters.failed.load(Ordering::SeqCst)
    }

    /// Stop the worker and wait for an in-progress reset to finish.
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.lock().await.take()
            && let Err(e) = task.await
        {
            error!(error = %e, "Balance reset job panicked");
        }
    }
}
