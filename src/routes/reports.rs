// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Monthly report routes.
//!
//! `GET` previews the reports for a period without delivering them; `POST`
//! runs a full dispatch, which is how a missed scheduled run is repeated.

use crate::error::Result;
use crate::reports::{DispatchSummary, MonthlyReport};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/v1/reports/monthly",
        get(preview_monthly).post(dispatch_monthly),
    )
}

#[derive(Debug, Deserialize, Validate)]
struct ReportPeriodRequest {
    year: i32,
    #[validate(range(min = 1, max = 12))]
    month: u32,
}

async fn preview_monthly(
    State(state): State<Arc<AppState>>,
    Query(period): Query<ReportPeriodRequest>,
) -> Result<Json<Vec<MonthlyReport>>> {
    period.validate()?;

    let reports = state
        .reports
        .aggregator()
        .aggregate(period.year, period.month)
        .await?;
    Ok(Json(reports))
}

async fn dispatch_monthly(
    State(state): State<Arc<AppState>>,
    Json(period): Json<ReportPeriodRequest>,
) -> Result<Json<DispatchSummary>> {
    period.validate()?;

    tracing::info!(
        year = period.year,
        month = period.month,
        "Manual monthly report dispatch"
    );
    let summary = state.reports.dispatch(period.year, period.month).await?;
    Ok(Json(summary))
}
