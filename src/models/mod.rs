// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod training;
pub mod user;

pub use training::{ActivityType, Training, TrainingDraft, TrainingPatch};
pub use user::{User, UserDraft, UserSearch, UserSummary};
