//! Cancellable periodic tasks.
//!
//! A [`Poller`] runs a [`PollJob`] on a fixed interval until its
//! [`CancellationToken`] fires. Stopping prevents new ticks; runs already in
//! flight are left to finish and the job decides whether their results still
//! matter.

pub mod config;

pub use config::{OverlapPolicy, PollingConfig};

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Work executed on every tick.
#[async_trait]
pub trait PollJob: Send + Sync + 'static {
    /// Name used in log events.
    fn name(&self) -> &str;

    async fn run(&self);
}

/// Periodic runner for a [`PollJob`].
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    overlap: OverlapPolicy,
}

impl Poller {
    pub fn new(interval: Duration, overlap: OverlapPolicy) -> Self {
        Self { interval, overlap }
    }

    /// Poller for the alarm feed.
    pub fn for_alarms(config: &PollingConfig) -> Self {
        Self::new(
            Duration::from_secs(config.alarm_interval_seconds),
            config.overlap,
        )
    }

    /// Start ticking. The first run happens immediately.
    pub fn start<J: PollJob>(self, job: Arc<J>, cancel_token: CancellationToken) -> PollHandle {
        let ticks = Arc::new(AtomicU64::new(0));
        let in_flight = Arc::new(AtomicBool::new(false));
        let token = cancel_token.clone();
        let tick_counter = Arc::clone(&ticks);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                job = job.name(),
                interval_ms = self.interval.as_millis() as u64,
                overlap = ?self.overlap,
                "Poller started"
            );

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::info!(job = job.name(), "Poller stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        if self.overlap == OverlapPolicy::Skip
                            && in_flight.swap(true, Ordering::AcqRel)
                        {
                            tracing::debug!(job = job.name(), "Previous run still in flight, skipping tick");
                            continue;
                        }
                        tick_counter.fetch_add(1, Ordering::Relaxed);

                        let job = Arc::clone(&job);
                        let in_flight = Arc::clone(&in_flight);
                        tokio::spawn(async move {
                            let _release = InFlightGuard(in_flight);
                            job.run().await;
                        });
                    }
                }
            }
        });

        PollHandle {
            cancel_token,
            task,
            ticks,
        }
    }
}

/// Clears the in-flight flag when a run ends, including by panic.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to a running poller.
#[derive(Debug)]
pub struct PollHandle {
    cancel_token: CancellationToken,
    task: JoinHandle<()>,
    ticks: Arc<AtomicU64>,
}

impl PollHandle {
    /// Stop issuing ticks. In-flight runs are not aborted.
    pub fn stop(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Number of runs started so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Stop and wait for the tick loop to exit.
    pub async fn shutdown(self) {
        self.stop();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Poller task ended abnormally");
        }
    }
}
