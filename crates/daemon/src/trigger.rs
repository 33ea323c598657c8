//! Daily schedule: compute the next run time and drive the loop.
//!
//! The scheduled and manual triggers are two callers of the same
//! [`run_pipeline`] entry point; the only thing this module adds is
//! *when* the scheduled caller fires.

use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};

use corrtrack_coingecko::PriceSource;
use corrtrack_core::config::PipelineConfig;
use corrtrack_pipeline::{run_pipeline, PublishOutcome, Trigger};

/// Next occurrence of `at` (a UTC time of day) strictly after `now`.
///
/// If today's occurrence is still ahead it is used; otherwise the run
/// moves to the same time tomorrow. `now` exactly on the boundary rolls
/// over to tomorrow, so a run never fires twice for one occurrence.
pub fn next_run_after(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        // succ_opt only fails at NaiveDate::MAX.
        now.date_naive()
            .succ_opt()
            .map(|d| d.and_time(at).and_utc())
            .unwrap_or(today)
    }
}

/// Run the daily schedule loop indefinitely.
///
/// Each cycle sleeps until the next occurrence of the configured UTC
/// time, then executes one scheduled pipeline run. A failed run is
/// logged and the loop continues with the next day; runs are never
/// retried within the same day.
pub async fn run_scheduler(config: &PipelineConfig, source: &dyn PriceSource) {
    loop {
        let now = Utc::now();
        let next = next_run_after(now, config.schedule_utc_time);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);

        tracing::info!(next_run = %next, wait_secs = wait.as_secs(), "Waiting for next scheduled run");
        tokio::time::sleep(wait).await;

        match run_pipeline(config, source, Trigger::Scheduled).await {
            Ok(report) => match report.outcome {
                PublishOutcome::Published { commit } => {
                    tracing::info!(
                        commit = %commit,
                        files_written = report.files_written,
                        "Scheduled run published data",
                    );
                }
                PublishOutcome::NoChanges => {
                    tracing::info!(
                        files_written = report.files_written,
                        "Scheduled run finished with no changes",
                    );
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Scheduled run failed");
            }
        }
    }
}
