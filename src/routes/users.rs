// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User directory routes.

use crate::error::{AppError, Result};
use crate::models::{User, UserDraft, UserSearch, UserSummary};
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
        .route("/v1/users", get(list_users).post(create_user))
        .route("/v1/users/simple", get(list_simple))
        .route("/v1/users/search", get(search_users))
        .route("/v1/users/email", get(find_by_email))
        .route("/v1/users/older/{date}", get(older_than))
        .route(
            "/v1/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users.list_users().await?))
}

async fn list_simple(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserSummary>>> {
    Ok(Json(state.users.list_simple().await?))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<User>> {
    Ok(Json(state.users.get_user(id).await?))
}

async fn search_users(
    State(state): State<Arc<AppState>>,
    Query(search): Query<UserSearch>,
) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users.search(&search).await?))
}

#[derive(Deserialize)]
struct EmailQuery {
    email: String,
}

async fn find_by_email(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<UserSummary>>> {
    Ok(Json(state.users.find_by_email(&query.email).await?))
}

async fn older_than(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<Vec<User>>> {
    let date = parse_date(&date).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", date))
    })?;
    Ok(Json(state.users.older_than(date).await?))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<UserDraft>,
) -> Result<(StatusCode, Json<User>)> {
    draft.validate()?;
    let user = state.users.create(draft).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(draft): Json<UserDraft>,
) -> Result<Json<User>> {
    draft.validate()?;
    Ok(Json(state.users.update(id, draft).await?))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
