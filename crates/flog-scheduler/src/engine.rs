use std::sync::Arc;
use std::time::Duration;

use flog_core::Clock;
use tokio::sync::{mpsc, watch};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

use crate::schedule::DailySchedule;
use crate::sweep::Sweeper;

/// Longest single sleep. Bounds drift when the wall clock jumps.
const MAX_SLEEP: Duration = Duration::from_secs(60 * 60);

/// Asks the engine for an immediate sweep.
#[derive(Clone)]
pub struct SweepTrigger {
    tx: mpsc::Sender<()>,
}

impl SweepTrigger {
    /// Requests coalesce: firing while one is already waiting is a no-op.
    pub fn fire(&self) {
        match self.tx.try_send(()) {
            Ok(()) => debug!("sweep requested"),
            Err(TrySendError::Full(())) => debug!("sweep already requested"),
            Err(TrySendError::Closed(())) => warn!("sweep engine is not running"),
        }
    }
}

/// Runs the sweep every day at the scheduled time, and on demand.
///
/// Sweeps never overlap: they run one at a time on the engine task.
pub struct SweepEngine {
    sweeper: Arc<Sweeper>,
    schedule: DailySchedule,
    clock: Arc<dyn Clock>,
    requests: mpsc::Receiver<()>,
}

impl SweepEngine {
    pub fn new(
        sweeper: Arc<Sweeper>,
        schedule: DailySchedule,
        clock: Arc<dyn Clock>,
    ) -> (Self, SweepTrigger) {
        let (tx, requests) = mpsc::channel(1);
        let engine = Self {
            sweeper,
            schedule,
            clock,
            requests,
        };
        (engine, SweepTrigger { tx })
    }

    /// Main loop. Returns once `shutdown` flips to `true` or its sender
    /// is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut next = self.schedule.next_after(self.clock.now());
        info!(next = %next, "sweep engine started");

        loop {
            let wait = (next - self.clock.now())
                .to_std()
                .unwrap_or(Duration::ZERO)
                .min(MAX_SLEEP);

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    if self.clock.now() >= next {
                        self.sweep("schedule").await;
                        next = self.schedule.next_after(self.clock.now());
                        info!(next = %next, "next scheduled sweep");
                    }
                }
                Some(()) = self.requests.recv() => {
                    self.sweep("request").await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("sweep engine shutting down");
                        break;
                    }
                }
            }
        }
    }

    async fn sweep(&self, trigger: &str) {
        debug!(trigger, "sweep starting");
        if let Err(e) = self.sweeper.sweep().await {
            error!(trigger, code = e.code(), error = %e, "sweep failed");
        }
    }
}
