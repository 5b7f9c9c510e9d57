// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::reports::DEFAULT_REPORT_CRON;
use crate::time_utils::{ReportTimeZone, TimeZoneParseError};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Where users and trainings are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Firestore,
    /// Process-local maps, lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Firestore => write!(f, "firestore"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    pub storage_backend: StorageBackend,
    /// GCP project ID
    pub gcp_project_id: String,

    // --- Monthly reports ---
    /// Time zone used to bucket trainings into calendar months
    pub report_time_zone: ReportTimeZone,
    /// Cron expression for the scheduled dispatch
    pub report_cron: String,
    pub report_schedule_enabled: bool,
    /// Deliver reports to this URL instead of the log
    pub report_webhook_url: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            storage_backend: StorageBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            report_time_zone: ReportTimeZone::utc(),
            report_cron: DEFAULT_REPORT_CRON.to_string(),
            report_schedule_enabled: false,
            report_webhook_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                name: "STORAGE_BACKEND",
                reason,
            })?,
            Err(_) => StorageBackend::Firestore,
        };

        let gcp_project_id = match env::var("GCP_PROJECT_ID") {
            Ok(id) => id,
            Err(_) if storage_backend == StorageBackend::Firestore => {
                return Err(ConfigError::Missing("GCP_PROJECT_ID"))
            }
            Err(_) => "local-dev".to_string(),
        };

        let report_time_zone = match env::var("REPORT_TIME_ZONE") {
            Ok(raw) => raw.parse().map_err(|e: TimeZoneParseError| {
                ConfigError::Invalid {
                    name: "REPORT_TIME_ZONE",
                    reason: e.to_string(),
                }
            })?,
            Err(_) => ReportTimeZone::Local,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            storage_backend,
            gcp_project_id,
            report_time_zone,
            report_cron: env::var("REPORT_CRON")
                .unwrap_or_else(|_| DEFAULT_REPORT_CRON.to_string()),
            report_schedule_enabled: env::var("REPORT_SCHEDULE_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            report_webhook_url: env::var("REPORT_WEBHOOK_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
