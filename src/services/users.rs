// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User directory service.
//!
//! Searches run over the full user listing; the directory is expected to be
//! small enough that filtering in memory is cheaper than maintaining indexes.

use crate::db::{Storage, TrainingRepository, UserDirectory, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{User, UserDraft, UserSearch, UserSummary};
use chrono::NaiveDate;
use std::sync::Arc;

/// CRUD and search operations over users.
#[derive(Clone)]
pub struct UserService {
    db: Arc<dyn Storage>,
}

impl UserService {
    pub fn new(db: Arc<dyn Storage>) -> Self {
        Self { db }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.db.list_users().await
    }

    /// ID and names of every user.
    pub async fn list_simple(&self) -> Result<Vec<UserSummary>> {
        Ok(self
            .db
            .list_users()
            .await?
            .iter()
            .map(UserSummary::basic)
            .collect())
    }

    pub async fn get_user(&self, user_id: u64) -> Result<User> {
        self.db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::user_not_found(user_id))
    }

    pub async fn search(&self, search: &UserSearch) -> Result<Vec<User>> {
        Ok(self
            .db
            .list_users()
            .await?
            .into_iter()
            .filter(|u| search.matches(u))
            .collect())
    }

    /// Users whose email contains `fragment`, ignoring case.
    pub async fn find_by_email(&self, fragment: &str) -> Result<Vec<UserSummary>> {
        Ok(self
            .db
            .list_users()
            .await?
            .iter()
            .filter(|u| u.email_contains(fragment))
            .map(UserSummary::with_email)
            .collect())
    }

    /// Users born strictly before `date`.
    pub async fn older_than(&self, date: NaiveDate) -> Result<Vec<User>> {
        Ok(self
            .db
            .list_users()
            .await?
            .into_iter()
            .filter(|u| u.birthdate < date)
            .collect())
    }

    pub async fn create(&self, draft: UserDraft) -> Result<User> {
        self.ensure_email_available(&draft.email, None).await?;

        let user = self.db.insert_user(draft).await?;
        tracing::info!(user_id = user.id, "Created user");
        Ok(user)
    }

    pub async fn update(&self, user_id: u64, draft: UserDraft) -> Result<User> {
        let mut user = self.get_user(user_id).await?;
        self.ensure_email_available(&draft.email, Some(user_id))
            .await?;

        user.apply(draft);
        self.db.update_user(&user).await?;
        tracing::info!(user_id, "Updated user");
        Ok(user)
    }

    /// Delete a user together with all of their trainings.
    pub async fn delete(&self, user_id: u64) -> Result<()> {
        // Existence check first so a missing user is reported, not silently ignored
        self.get_user(user_id).await?;

        let trainings = self.db.delete_trainings_for_user(user_id).await?;
        self.db.delete_user(user_id).await?;

        tracing::info!(user_id, trainings, "Deleted user");
        Ok(())
    }

    /// Reject `email` if a user other than `owner` already uses it.
    async fn ensure_email_available(&self, email: &str, owner: Option<u64>) -> Result<()> {
        let taken = self
            .db
            .list_users()
            .await?
            .iter()
            .any(|u| u.has_email(email) && Some(u.id) != owner);

        if taken {
            return Err(AppError::Conflict(format!(
                "Email {} is already registered",
                email
            )));
        }
        Ok(())
    }
}
