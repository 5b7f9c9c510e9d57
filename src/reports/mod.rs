// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Monthly training reports.
//!
//! Pipeline:
//! 1. [`ReportAggregator`] counts each user's trainings in a calendar month
//! 2. [`ReportDispatcher`] hands every report to a [`ReportSink`]
//! 3. [`scheduler`] fires the dispatcher once a month for the previous month

pub mod aggregator;
pub mod dispatcher;
pub mod scheduler;
pub mod sink;

pub use aggregator::ReportAggregator;
pub use dispatcher::{DispatchSummary, ReportDispatcher};
pub use scheduler::DEFAULT_REPORT_CRON;
pub use sink::{LogSink, ReportSink, SinkError, WebhookSink};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Per-user training count for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthlyReport {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub email: String,
    pub year: i32,
    pub month: u32,
    pub training_count: u32,
}

/// A (year, month) aggregation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub year: i32,
    pub month: u32,
}

impl ReportPeriod {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The calendar month before the one containing `today`.
    pub fn preceding(today: NaiveDate) -> Self {
        if today.month() == 1 {
            Self::new(today.year() - 1, 12)
        } else {
            Self::new(today.year(), today.month() - 1)
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
