// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness Tracker API Server
//!
//! Serves the user and training directories and sends monthly training
//! reports on a schedule.

use fitness_tracker::{
    config::{Config, StorageBackend},
    db::{FirestoreDb, MemoryDb},
    reports::{self, LogSink, ReportSink, WebhookSink},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        storage = %config.storage_backend,
        time_zone = %config.report_time_zone,
        "Starting Fitness Tracker API"
    );

    let sink: Arc<dyn ReportSink> = match &config.report_webhook_url {
        Some(url) => {
            let sink = WebhookSink::new(url.clone());
            tracing::info!(url = sink.url(), "Delivering monthly reports to webhook");
            Arc::new(sink)
        }
        None => {
            tracing::info!("Delivering monthly reports to the log");
            Arc::new(LogSink)
        }
    };

    let state = match config.storage_backend {
        StorageBackend::Firestore => {
            let db = FirestoreDb::new(&config.gcp_project_id).await?;
            AppState::new(config.clone(), db, sink)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            AppState::new(config.clone(), MemoryDb::new(), sink)
        }
    };
    let state = Arc::new(state);

    // Scheduler handle is kept for the lifetime of the server
    let _scheduler = if config.report_schedule_enabled {
        Some(
            reports::scheduler::start(state.reports.clone(), &config.report_cron).await?,
        )
    } else {
        tracing::info!("Monthly report scheduler disabled");
        None
    };

    // Build router
    let app = fitness_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fitness_tracker=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
