// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of physical activity recorded by a training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityType {
    Running,
    Cycling,
    Walking,
    Swimming,
    Tennis,
}

impl ActivityType {
    /// Stored (and serialized) name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Running => "RUNNING",
            ActivityType::Cycling => "CYCLING",
            ActivityType::Walking => "WALKING",
            ActivityType::Swimming => "SWIMMING",
            ActivityType::Tennis => "TENNIS",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityType::Running => "Running",
            ActivityType::Cycling => "Cycling",
            ActivityType::Walking => "Walking",
            ActivityType::Swimming => "Swimming",
            ActivityType::Tennis => "Tennis",
        }
    }
}

/// Stored training record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Training {
    /// Storage-assigned ID (also used as document ID)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    /// Owning user
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    /// Start instant; trainings without one never count toward a month
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub start_time: Option<DateTime<Utc>>,
    /// Stored as a native timestamp so range filters compare instants
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub end_time: Option<DateTime<Utc>>,
    pub activity_type: ActivityType,
    /// Distance in kilometers
    pub distance: f64,
    /// Average speed in km/h
    pub average_speed: f64,
}

impl Training {
    pub fn from_draft(id: u64, draft: TrainingDraft) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            start_time: draft.start_time,
            end_time: draft.end_time,
            activity_type: draft.activity_type,
            distance: draft.distance,
            average_speed: draft.average_speed,
        }
    }

    /// Apply a partial update; absent fields keep their stored value.
    pub fn apply(&mut self, patch: TrainingPatch) {
        if let Some(start_time) = patch.start_time {
            self.start_time = Some(start_time);
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = Some(end_time);
        }
        if let Some(activity_type) = patch.activity_type {
            self.activity_type = activity_type;
        }
        if let Some(distance) = patch.distance {
            self.distance = distance;
        }
        if let Some(average_speed) = patch.average_speed {
            self.average_speed = average_speed;
        }
    }
}

/// Training fields supplied on create.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TrainingDraft {
    pub user_id: u64,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub activity_type: ActivityType,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub distance: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub average_speed: f64,
}

/// Partial training update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TrainingPatch {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub activity_type: Option<ActivityType>,
    #[validate(range(min = 0.0))]
    pub distance: Option<f64>,
    #[validate(range(min = 0.0))]
    pub average_speed: Option<f64>,
}
