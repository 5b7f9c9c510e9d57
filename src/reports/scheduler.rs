// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Monthly trigger for report dispatch.

use crate::reports::{ReportDispatcher, ReportPeriod};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// 01:00 on the first day of every month (sec min hour day month weekday).
pub const DEFAULT_REPORT_CRON: &str = "0 0 1 1 * *";

/// Dispatch reports for the month preceding today in the report time zone.
pub async fn run_for_previous_month(dispatcher: &ReportDispatcher) {
    let period = ReportPeriod::preceding(dispatcher.aggregator().time_zone().today());
    tracing::info!(period = %period, "Scheduled monthly report run");

    match dispatcher.dispatch(period.year, period.month).await {
        Ok(summary) if summary.is_complete_success() => {
            tracing::info!(
                period = %period,
                delivered = summary.delivered,
                "Scheduled monthly reports delivered"
            );
        }
        Ok(summary) => {
            tracing::warn!(
                period = %period,
                delivered = summary.delivered,
                failed = summary.failed,
                failed_user_ids = ?summary.failed_user_ids,
                "Scheduled monthly reports partially delivered"
            );
        }
        Err(e) => {
            tracing::error!(period = %period, error = %e, "Scheduled monthly report run failed");
        }
    }
}

/// Start a scheduler that runs the monthly dispatch on `cron`.
///
/// The schedule itself is evaluated in UTC; the reported period is derived
/// from today's date in the dispatcher's report time zone.
pub async fn start(
    dispatcher: Arc<ReportDispatcher>,
    cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let time_zone = dispatcher.aggregator().time_zone();
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_uuid, _scheduler| {
        let dispatcher = dispatcher.clone();
        Box::pin(async move {
            run_for_previous_month(&dispatcher).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(cron, time_zone = %time_zone, "Monthly report scheduler started");

    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryDb, UserRepository};
    use crate::models::UserDraft;
    use crate::reports::{LogSink, ReportAggregator};
    use crate::time_utils::ReportTimeZone;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_default_cron_is_accepted() {
        let job = Job::new_async(DEFAULT_REPORT_CRON, |_uuid, _scheduler| {
            Box::pin(async {})
        });
        assert!(job.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_cron_is_rejected() {
        let db = Arc::new(MemoryDb::new());
        let dispatcher = Arc::new(ReportDispatcher::new(
            ReportAggregator::new(db.clone(), db, ReportTimeZone::utc()),
            Arc::new(LogSink),
        ));
        assert!(start(dispatcher, "not a cron").await.is_err());
    }

    #[tokio::test]
    async fn test_run_for_previous_month_completes() {
        let db = Arc::new(MemoryDb::new());
        db.insert_user(UserDraft {
            first_name: "Ola".to_string(),
            last_name: "Lis".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1995, 1, 1).unwrap(),
            email: "ola@x.com".to_string(),
        })
        .await
        .unwrap();

        let dispatcher = ReportDispatcher::new(
            ReportAggregator::new(db.clone(), db, ReportTimeZone::utc()),
            Arc::new(LogSink),
        );
        run_for_previous_month(&dispatcher).await;
    }
}
