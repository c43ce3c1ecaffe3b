//! Periodic tracking and daily reporting
//!
//! One task drives both jobs, so a sample and a report never run at the
//! same time. A failed run is logged and the loop carries on.

use crate::error::Result;
use crate::sampler::FeeSampler;
use chrono::{DateTime, NaiveTime, Utc};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// First instant strictly after `now` whose UTC wall-clock time is `at`
pub fn next_report_at(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    }
}

/// Counters of one scheduler run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub tracks: u64,
    pub reports: u64,
    pub failures: u64,
}

/// Runs `track` every interval and `report` once a day
#[derive(Debug)]
pub struct Scheduler {
    sampler: FeeSampler,
    track_interval: Duration,
    report_at: NaiveTime,
}

impl Scheduler {
    pub fn new(sampler: FeeSampler, track_interval: Duration, report_at: NaiveTime) -> Self {
        Self {
            sampler,
            track_interval,
            report_at,
        }
    }

    /// Loop until `shutdown` resolves. The first sample is taken right away.
    pub async fn run<F>(self, shutdown: F) -> SchedulerStats
    where
        F: Future<Output = ()>,
    {
        let mut stats = SchedulerStats::default();
        let mut ticker = tokio::time::interval(self.track_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut next_report = next_report_at(Utc::now(), self.report_at);
        info!(
            interval_secs = self.track_interval.as_secs_f64(),
            next_report = %next_report,
            "scheduler started"
        );

        loop {
            let until_report = (next_report - Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO);

            tokio::select! {
                () = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    stats.tracks += 1;
                    if !run_task("track", self.sampler.track()).await {
                        stats.failures += 1;
                    }
                }
                () = tokio::time::sleep(until_report) => {
                    stats.reports += 1;
                    if !run_task("report", self.sampler.report()).await {
                        stats.failures += 1;
                    }
                    next_report = next_report_at(Utc::now().max(next_report), self.report_at);
                    info!(next_report = %next_report, "next report scheduled");
                }
            }
        }

        info!(
            tracks = stats.tracks,
            reports = stats.reports,
            failures = stats.failures,
            "scheduler stopped"
        );
        stats
    }
}

/// Await one scheduled task and log its cost. Returns whether it succeeded.
async fn run_task<T, F>(name: &str, task: F) -> bool
where
    F: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let result = task.await;
    let cost_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(_) => {
            info!(task = name, cost_ms, "scheduled task finished");
            true
        }
        Err(e) => {
            error!(task = name, cost_ms, error = %e, "scheduled task failed");
            false
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c"),
        () = terminate => info!("received SIGTERM"),
    }
}
