// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory storage backend.
//!
//! Used for local development (`STORAGE_BACKEND=memory`) and tests. Data lives
//! only as long as the process.

use crate::db::{TrainingDirectory, TrainingRepository, UserDirectory, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{ActivityType, Training, TrainingDraft, User, UserDraft};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    users: DashMap<u64, User>,
    trainings: DashMap<u64, Training>,
    last_user_id: AtomicU64,
    last_training_id: AtomicU64,
}

/// Process-local store backed by concurrent hash maps.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Inner>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of trainings matching `predicate`, ordered by ID.
    fn trainings_where(&self, predicate: impl Fn(&Training) -> bool) -> Vec<Training> {
        let mut trainings: Vec<Training> = self
            .inner
            .trainings
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        trainings.sort_by_key(|t| t.id);
        trainings
    }
}

#[async_trait]
impl UserDirectory for MemoryDb {
    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self
            .inner
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}

#[async_trait]
impl UserRepository for MemoryDb {
    async fn get_user(&self, user_id: u64) -> Result<Option<User>> {
        Ok(self.inner.users.get(&user_id).map(|u| u.value().clone()))
    }

    async fn insert_user(&self, draft: UserDraft) -> Result<User> {
        let id = self.inner.last_user_id.fetch_add(1, Ordering::Relaxed) + 1;
        let user = User::from_draft(id, draft);
        self.inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        match self.inner.users.get_mut(&user.id) {
            Some(mut stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(AppError::user_not_found(user.id)),
        }
    }

    async fn delete_user(&self, user_id: u64) -> Result<()> {
        self.inner.users.remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl TrainingDirectory for MemoryDb {
    async fn trainings_for_user(&self, user_id: u64) -> Result<Vec<Training>> {
        Ok(self.trainings_where(|t| t.user_id == user_id))
    }
}

#[async_trait]
impl TrainingRepository for MemoryDb {
    async fn list_trainings(&self) -> Result<Vec<Training>> {
        Ok(self.trainings_where(|_| true))
    }

    async fn get_training(&self, training_id: u64) -> Result<Option<Training>> {
        Ok(self
            .inner
            .trainings
            .get(&training_id)
            .map(|t| t.value().clone()))
    }

    async fn trainings_ended_after(&self, instant: DateTime<Utc>) -> Result<Vec<Training>> {
        Ok(self.trainings_where(|t| t.end_time.is_some_and(|end| end > instant)))
    }

    async fn trainings_by_activity(&self, activity_type: ActivityType) -> Result<Vec<Training>> {
        Ok(self.trainings_where(|t| t.activity_type == activity_type))
    }

    async fn insert_training(&self, draft: TrainingDraft) -> Result<Training> {
        let id = self.inner.last_training_id.fetch_add(1, Ordering::Relaxed) + 1;
        let training = Training::from_draft(id, draft);
        self.inner.trainings.insert(id, training.clone());
        Ok(training)
    }

    async fn update_training(&self, training: &Training) -> Result<()> {
        match self.inner.trainings.get_mut(&training.id) {
            Some(mut stored) => {
                *stored = training.clone();
                Ok(())
            }
            None => Err(AppError::training_not_found(training.id)),
        }
    }

    async fn delete_trainings_for_user(&self, user_id: u64) -> Result<usize> {
        let before = self.inner.trainings.len();
        self.inner.trainings.retain(|_, t| t.user_id != user_id);
        Ok(before.saturating_sub(self.inner.trainings.len()))
    }
}
