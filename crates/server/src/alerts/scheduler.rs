//! Recurring driver for the daily alert passes.

use crate::AppResources;
use crate::alerts::checks::run_daily_checks;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Runs [`run_daily_checks`] on a fixed interval.
#[derive(Debug)]
pub struct AlertScheduler {
    resources: AppResources,
    interval: Duration,
    run_on_start: bool,
}

impl AlertScheduler {
    pub fn new(resources: AppResources, interval: Duration) -> Self {
        Self {
            resources,
            interval,
            run_on_start: true,
        }
    }

    /// Interval and start-up behaviour from `scheduler.*` in the config.
    pub fn from_config(resources: AppResources) -> Self {
        let interval = resources.config.scheduler.interval();
        let run_on_start = resources.config.scheduler.run_on_start;
        Self::new(resources, interval).run_on_start(run_on_start)
    }

    pub fn run_on_start(mut self, enabled: bool) -> Self {
        self.run_on_start = enabled;
        self
    }

    /// Runs the first pass (awaited) and then spawns the interval loop.
    ///
    /// Passes are sequential inside the loop, so they never overlap.
    #[tracing::instrument(skip(self), fields(interval_secs = self.interval.as_secs()))]
    pub async fn start(self) -> SchedulerHandle {
        let AlertScheduler {
            resources,
            interval,
            run_on_start,
        } = self;

        if run_on_start {
            run_daily_checks(&resources, OffsetDateTime::now_utc()).await;
        }

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        run_daily_checks(&resources, OffsetDateTime::now_utc()).await;
                    }
                }
            }
            tracing::info!(
                name = "alerts.scheduler.stopped",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                message = "Alert scheduler stopped"
            );
        });

        tracing::info!(
            name = "alerts.scheduler.started",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            interval_secs = interval.as_secs(),
            message = "Alert scheduler started"
        );
        SchedulerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Owned handle to a running scheduler. Dropping the handle also ends the
/// loop after the current pass; [`SchedulerHandle::stop`] waits for that.
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signals the loop and waits for it to exit. A pass already in progress
    /// finishes first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::error!(
                name = "alerts.scheduler.join_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = %e,
                message = "Alert scheduler task ended abnormally"
            );
        }
    }
}
