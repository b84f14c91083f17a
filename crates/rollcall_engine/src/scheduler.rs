use std::sync::Arc;
use std::time::Duration;

use rollcall_logging::{rollcall_debug, rollcall_info};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::reconciler::Reconciler;

/// Periodic trigger for [`Reconciler::run_cycle`].
pub struct Scheduler;

pub struct SchedulerHandle {
    cancel: CancellationToken,
    task: JoinHandle<u64>,
}

impl Scheduler {
    /// Runs the first cycle immediately (flagged as first run), then every `period`.
    ///
    /// Cycles never overlap; a slow cycle delays the following tick.
    pub fn spawn(reconciler: Arc<Reconciler>, period: Duration) -> SchedulerHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let period = period.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut cycles: u64 = 0;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let first_run = cycles == 0;
                        rollcall_debug!("Scheduler tick cycle={} first_run={}", cycles, first_run);
                        reconciler.run_cycle(first_run).await;
                        cycles += 1;
                    }
                }
            }

            rollcall_info!("Scheduler stopped after {} cycles", cycles);
            cycles
        });

        SchedulerHandle { cancel, task }
    }
}

impl SchedulerHandle {
    /// Token that stops the scheduler when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stops the scheduler after any running cycle and returns how many cycles ran.
    pub async fn stop(self) -> u64 {
        self.cancel.cancel();
        self.task.await.unwrap_or(0)
    }
}
