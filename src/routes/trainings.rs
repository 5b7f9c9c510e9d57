// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training directory routes.

use crate::error::{AppError, Result};
use crate::models::{ActivityType, Training, TrainingDraft, TrainingPatch};
use crate::time_utils::parse_date;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/trainings", get(list_trainings).post(create_training))
        .route("/v1/trainings/user/{user_id}", get(trainings_for_user))
        .route("/v1/trainings/finished/{date}", get(finished_after))
        .route("/v1/trainings/activity_type", get(by_activity))
        .route(
            "/v1/trainings/{id}",
            get(get_training).put(update_training),
        )
}

async fn list_trainings(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Training>>> {
    Ok(Json(state.trainings.list_trainings().await?))
}

async fn get_training(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Training>> {
    Ok(Json(state.trainings.get_training(id).await?))
}

async fn trainings_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
) -> Result<Json<Vec<Training>>> {
    Ok(Json(state.trainings.for_user(user_id).await?))
}

/// Trainings that ended after the given `YYYY-MM-DD` date began.
async fn finished_after(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Training>>> {
    let date = parse_date(&date).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", date))
    })?;
    Ok(Json(state.trainings.finished_after(date).await?))
}

#[derive(Deserialize)]
struct ActivityQuery {
    activity_type: ActivityType,
}

async fn by_activity(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<Training>>> {
    Ok(Json(state.trainings.by_activity(query.activity_type).await?))
}

async fn create_training(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TrainingDraft>,
) -> Result<(StatusCode, Json<Training>)> {
    draft.validate()?;
    let training = state.trainings.create(draft).await?;
    Ok((StatusCode::CREATED, Json(training)))
}

async fn update_training(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(patch): Json<TrainingPatch>,
) -> Result<Json<Training>> {
    patch.validate()?;
    Ok(Json(state.trainings.update(id, patch).await?))
}
