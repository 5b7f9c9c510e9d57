// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user monthly training counts.

use crate::db::{TrainingDirectory, UserDirectory};
use crate::error::Result;
use crate::models::Training;
use crate::reports::MonthlyReport;
use crate::time_utils::ReportTimeZone;
use std::sync::Arc;

/// Computes one [`MonthlyReport`] per user for a calendar month.
#[derive(Clone)]
pub struct ReportAggregator {
    users: Arc<dyn UserDirectory>,
    trainings: Arc<dyn TrainingDirectory>,
    time_zone: ReportTimeZone,
}

impl ReportAggregator {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        trainings: Arc<dyn TrainingDirectory>,
        time_zone: ReportTimeZone,
    ) -> Self {
        Self {
            users,
            trainings,
            time_zone,
        }
    }

    pub fn time_zone(&self) -> ReportTimeZone {
        self.time_zone
    }

    /// Count every user's trainings that started in `year`/`month`.
    ///
    /// Reports follow the user directory's order and include users with no
    /// matching trainings. A failed directory read aborts the whole run.
    pub async fn aggregate(&self, year: i32, month: u32) -> Result<Vec<MonthlyReport>> {
        let users = self.users.list_users().await?;
        let mut reports = Vec::with_capacity(users.len());

        for user in users {
            let trainings = self.trainings.trainings_for_user(user.id).await?;
            let training_count = count_in_month(&trainings, year, month, self.time_zone);

            reports.push(MonthlyReport {
                user_id: user.id,
                email: user.email,
                year,
                month,
                training_count,
            });
        }

        tracing::debug!(
            year,
            month,
            users = reports.len(),
            time_zone = %self.time_zone,
            "Aggregated monthly reports"
        );

        Ok(reports)
    }
}

/// Number of trainings whose start falls in the given calendar month.
fn count_in_month(trainings: &[Training], year: i32, month: u32, tz: ReportTimeZone) -> u32 {
    let count = trainings
        .iter()
        .filter_map(|t| t.start_time)
        .filter(|start| tz.year_month(*start) == (year, month))
        .count();
    saturating_count(count)
}

fn saturating_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
