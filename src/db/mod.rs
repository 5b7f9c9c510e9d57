// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! The report pipeline only reads through [`UserDirectory`] and
//! [`TrainingDirectory`]. The CRUD services use the wider repository traits.
//! Both Firestore and an in-memory store implement all of them.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::Result;
use crate::models::{ActivityType, Training, TrainingDraft, User, UserDraft};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const TRAININGS: &str = "trainings";
    /// ID counters (keyed by collection name)
    pub const COUNTERS: &str = "counters";
}

/// Read access to the full user set.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All users, ordered by ID.
    async fn list_users(&self) -> Result<Vec<User>>;
}

/// Read access to trainings keyed by owner.
#[async_trait]
pub trait TrainingDirectory: Send + Sync {
    /// All trainings owned by `user_id`, ordered by ID.
    async fn trainings_for_user(&self, user_id: u64) -> Result<Vec<Training>>;
}

/// User persistence.
#[async_trait]
pub trait UserRepository: UserDirectory {
    async fn get_user(&self, user_id: u64) -> Result<Option<User>>;

    /// Store a new user under a freshly allocated ID.
    async fn insert_user(&self, draft: UserDraft) -> Result<User>;

    /// Overwrite an existing user.
    async fn update_user(&self, user: &User) -> Result<()>;

    async fn delete_user(&self, user_id: u64) -> Result<()>;
}

/// Training persistence.
#[async_trait]
pub trait TrainingRepository: TrainingDirectory {
    /// All trainings, ordered by ID.
    async fn list_trainings(&self) -> Result<Vec<Training>>;

    async fn get_training(&self, training_id: u64) -> Result<Option<Training>>;

    /// Trainings whose end time is strictly after `instant`.
    async fn trainings_ended_after(&self, instant: DateTime<Utc>) -> Result<Vec<Training>>;

    async fn trainings_by_activity(&self, activity_type: ActivityType) -> Result<Vec<Training>>;

    /// Store a new training under a freshly allocated ID.
    async fn insert_training(&self, draft: TrainingDraft) -> Result<Training>;

    /// Overwrite an existing training.
    async fn update_training(&self, training: &Training) -> Result<()>;

    /// Delete every training owned by `user_id`, returning how many were removed.
    async fn delete_trainings_for_user(&self, user_id: u64) -> Result<usize>;
}

/// Complete storage backend.
pub trait Storage: UserRepository + TrainingRepository {}

impl<T: UserRepository + TrainingRepository> Storage for T {}
