// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness Tracker: users, their trainings and monthly training reports
//!
//! This crate provides the backend API for the user and training directories
//! and the monthly report pipeline that delivers per-user training counts.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod reports;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Storage;
use reports::{ReportAggregator, ReportDispatcher, ReportSink};
use services::{TrainingService, UserService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub users: UserService,
    pub trainings: TrainingService,
    pub reports: Arc<ReportDispatcher>,
}

impl AppState {
    /// Wire services and the report pipeline over one storage backend.
    pub fn new<S: Storage + 'static>(config: Config, db: S, sink: Arc<dyn ReportSink>) -> Self {
        let db = Arc::new(db);
        let time_zone = config.report_time_zone;

        let aggregator = ReportAggregator::new(db.clone(), db.clone(), time_zone);

        Self {
            users: UserService::new(db.clone()),
            trainings: TrainingService::new(db, time_zone),
            reports: Arc::new(ReportDispatcher::new(aggregator, sink)),
            config,
        }
    }
}
