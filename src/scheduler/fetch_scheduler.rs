//! Periodic fetch scheduler
//!
//! Fires a fetch cycle every configured interval (5 minutes by default).
//! The first tick comes one interval after start, since startup already ran
//! a cycle. Cycles themselves are serialised by `FetchService`.

use crate::services::{FetchService, Trigger};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

/// Fetch scheduler driving `FetchService` on a fixed interval
pub struct FetchScheduler {
    fetch: Arc<FetchService>,
    period: Duration,
}

/// Handle to a running scheduler; stopping it ends the loop after the current cycle
pub struct SchedulerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl FetchScheduler {
    /// Create a new fetch scheduler
    pub fn new(fetch: Arc<FetchService>, period: Duration) -> Self {
        Self { fetch, period }
    }

    /// Spawn the timer loop on the tokio runtime
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            info!(
                "Fetch scheduler started, interval {} minutes {} seconds",
                self.period.as_secs() / 60,
                self.period.as_secs() % 60
            );

            let mut ticker = interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let report = self.fetch.run_cycle(Trigger::Timer).await;
                        info!("Scheduled cycle {} finished", report.cycle_id);
                    }
                    _ = &mut shutdown_rx => {
                        info!("Fetch scheduler stopping");
                        break;
                    }
                }
            }
        });

        SchedulerHandle {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

impl SchedulerHandle {
    /// Signal the loop to stop
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(()).is_err() {
                warn!("Fetch scheduler already stopped");
            }
        }
    }

    /// Stop and wait for the loop to exit
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Fetch scheduler task ended abnormally: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
