// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report delivery sinks.
//!
//! - [`LogSink`] writes each report as a structured log event
//! - [`WebhookSink`] POSTs each report as JSON to a configured URL

use crate::reports::MonthlyReport;
use async_trait::async_trait;

/// Report delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Delivery request failed: {0}")]
    Transport(String),

    #[error("Delivery rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Destination for finished monthly reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Deliver a single report.
    async fn deliver(&self, report: &MonthlyReport) -> Result<(), SinkError>;
}

/// Sink that records reports in the application log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl ReportSink for LogSink {
    async fn deliver(&self, report: &MonthlyReport) -> Result<(), SinkError> {
        tracing::info!(
            user_id = report.user_id,
            email = %report.email,
            year = report.year,
            month = report.month,
            training_count = report.training_count,
            "Monthly training report"
        );
        Ok(())
    }
}

/// Sink that POSTs reports to an HTTP endpoint.
#[derive(Clone)]
pub struct WebhookSink {
    http: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ReportSink for WebhookSink {
    async fn deliver(&self, report: &MonthlyReport) -> Result<(), SinkError> {
        let response = self
            .http
            .post(&self.url)
            .json(report)
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            user_id = report.user_id,
            url = %self.url,
            "Report delivered to webhook"
        );
        Ok(())
    }
}
