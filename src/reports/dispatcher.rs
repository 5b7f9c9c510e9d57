// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Drives aggregation for a period and delivers every report.
//!
//! Delivery is best-effort: a failed report is logged and recorded in the
//! [`DispatchSummary`], and the remaining reports are still delivered.

use crate::error::Result;
use crate::reports::{ReportAggregator, ReportSink};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Outcome of one dispatch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DispatchSummary {
    pub year: i32,
    pub month: u32,
    /// Number of reports the sink accepted.
    pub delivered: u32,
    /// Number of reports the sink rejected.
    pub failed: u32,
    /// Users whose report could not be delivered.
    #[cfg_attr(feature = "binding-generation", ts(type = "Array<number>"))]
    pub failed_user_ids: Vec<u64>,
}

impl DispatchSummary {
    /// Returns true if every report was delivered.
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    /// Returns true if no report was delivered and at least one failed.
    pub fn is_complete_failure(&self) -> bool {
        self.delivered == 0 && self.failed > 0
    }

    /// Returns true if some reports were delivered and some failed.
    pub fn is_partial_failure(&self) -> bool {
        self.delivered > 0 && self.failed > 0
    }
}

/// Aggregates a period and forwards each report to the sink.
#[derive(Clone)]
pub struct ReportDispatcher {
    aggregator: ReportAggregator,
    sink: Arc<dyn ReportSink>,
}

impl ReportDispatcher {
    pub fn new(aggregator: ReportAggregator, sink: Arc<dyn ReportSink>) -> Self {
        Self { aggregator, sink }
    }

    pub fn aggregator(&self) -> &ReportAggregator {
        &self.aggregator
    }

    /// Aggregate `year`/`month` once, then deliver the reports in order.
    ///
    /// Errors only when aggregation fails, in which case nothing is delivered.
    pub async fn dispatch(&self, year: i32, month: u32) -> Result<DispatchSummary> {
        let reports = self.aggregator.aggregate(year, month).await?;

        tracing::info!(year, month, reports = reports.len(), "Dispatching monthly reports");

        let mut summary = DispatchSummary {
            year,
            month,
            ..Default::default()
        };

        for report in &reports {
            match self.sink.deliver(report).await {
                Ok(()) => summary.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        user_id = report.user_id,
                        year,
                        month,
                        error = %e,
                        "Failed to deliver monthly report"
                    );
                    summary.failed += 1;
                    summary.failed_user_ids.push(report.user_id);
                }
            }
        }

        tracing::info!(
            year,
            month,
            delivered = summary.delivered,
            failed = summary.failed,
            "Monthly report dispatch finished"
        );

        Ok(summary)
    }
}
