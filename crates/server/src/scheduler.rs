//! Scheduled sync and cleanup passes.
//!
//! The daily job runs the order sync and the retention cleanup back to back.
//! The two passes are independent: each catches its own failure, reports it
//! to Sentry and lets the other still run, so a flaky upstream never stops
//! retention from advancing (and vice versa).

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::services::SyncService;
use crate::state::AppState;

/// Run one full mirror pass: order sync, then retention cleanup.
pub async fn run_daily_sync(state: &AppState) {
    let service = SyncService::new(
        state.woo().clone(),
        state.pool().clone(),
        &state.config().sync,
    );

    match service.sync_orders().await {
        Ok(summary) => tracing::info!(?summary, "Scheduled order sync finished"),
        Err(err) => {
            let event_id = sentry::capture_error(&err);
            tracing::error!(
                error = %err,
                sentry_event_id = %event_id,
                "Scheduled order sync failed"
            );
        }
    }

    match service.cleanup_old_orders().await {
        Ok(summary) => tracing::info!(?summary, "Scheduled retention cleanup finished"),
        Err(err) => {
            let event_id = sentry::capture_error(&err);
            tracing::error!(
                error = %err,
                sentry_event_id = %event_id,
                "Scheduled retention cleanup failed"
            );
        }
    }
}

/// Start the in-process scheduler.
///
/// Spawns an immediate pass when `SYNC_ON_BOOT` is set, then registers the
/// cron job. Returns `None` when the scheduler is disabled; the returned
/// `JobScheduler` must be kept alive for the jobs to fire.
///
/// # Errors
///
/// Returns `JobSchedulerError` if the cron expression is invalid or the
/// scheduler cannot start.
pub async fn start(state: AppState) -> Result<Option<JobScheduler>, JobSchedulerError> {
    if state.config().sync.sync_on_boot {
        let boot_state = state.clone();
        tokio::spawn(async move {
            tracing::info!("Running boot-time sync pass");
            run_daily_sync(&boot_state).await;
        });
    }

    if !state.config().sync.scheduler_enabled {
        tracing::info!("Scheduler disabled");
        return Ok(None);
    }

    let cron = state.config().sync.cron.clone();
    let sched = JobScheduler::new().await?;

    let job_state = state.clone();
    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let state = job_state.clone();
        Box::pin(async move {
            run_daily_sync(&state).await;
        })
    })?;
    sched.add(job).await?;
    sched.start().await?;

    tracing::info!(cron = %cron, "Scheduler started");
    Ok(Some(sched))
}
