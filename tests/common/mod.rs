// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use chrono::{DateTime, NaiveDate, Utc};
use fitness_tracker::config::Config;
use fitness_tracker::db::{
    FirestoreDb, MemoryDb, TrainingDirectory, TrainingRepository, UserDirectory, UserRepository,
};
use fitness_tracker::error::{AppError, Result};
use fitness_tracker::models::{ActivityType, Training, TrainingDraft, User, UserDraft};
use fitness_tracker::reports::{MonthlyReport, ReportSink, SinkError};
use fitness_tracker::routes::create_router;
use fitness_tracker::AppState;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Parse an RFC3339 timestamp into UTC.
#[allow(dead_code)]
pub fn at(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("valid RFC3339 timestamp")
}

/// Sink that keeps every delivered report and can refuse chosen users.
#[derive(Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<MonthlyReport>>,
    reject: HashSet<u64>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that fails delivery for the listed users.
    pub fn rejecting(user_ids: &[u64]) -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            reject: user_ids.iter().copied().collect(),
        }
    }

    pub fn delivered(&self) -> Vec<MonthlyReport> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSink for RecordingSink {
    async fn deliver(&self, report: &MonthlyReport) -> std::result::Result<(), SinkError> {
        if self.reject.contains(&report.user_id) {
            return Err(SinkError::Rejected {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        self.delivered.lock().unwrap().push(report.clone());
        Ok(())
    }
}

/// Directory whose reads always fail.
#[allow(dead_code)]
pub struct BrokenDirectory;

#[async_trait]
impl UserDirectory for BrokenDirectory {
    async fn list_users(&self) -> Result<Vec<User>> {
        Err(AppError::Database("users unavailable".to_string()))
    }
}

#[async_trait]
impl TrainingDirectory for BrokenDirectory {
    async fn trainings_for_user(&self, _user_id: u64) -> Result<Vec<Training>> {
        Err(AppError::Database("trainings unavailable".to_string()))
    }
}

/// Test harness around the router, backed by in-memory storage.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub db: MemoryDb,
    pub sink: Arc<RecordingSink>,
}

/// Create a test app with in-memory storage and a recording sink.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_sink(RecordingSink::new())
}

#[allow(dead_code)]
pub fn create_test_app_with_sink(sink: RecordingSink) -> TestApp {
    let db = MemoryDb::new();
    let sink = Arc::new(sink);
    let state = Arc::new(AppState::new(Config::default(), db.clone(), sink.clone()));

    TestApp {
        router: create_router(state.clone()),
        state,
        db,
        sink,
    }
}

#[allow(dead_code)]
pub async fn seed_user(db: &MemoryDb, first_name: &str, email: &str) -> User {
    db.insert_user(UserDraft {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        birthdate: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        email: email.to_string(),
    })
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn seed_training(db: &MemoryDb, user_id: u64, start: Option<&str>) -> Training {
    db.insert_training(TrainingDraft {
        user_id,
        start_time: start.map(at),
        end_time: start.map(|s| at(s) + chrono::Duration::minutes(45)),
        activity_type: ActivityType::Running,
        distance: 8.0,
        average_speed: 10.5,
    })
    .await
    .unwrap()
}

/// JSON request with the given method.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
