// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training directory service.

use crate::db::{Storage, TrainingDirectory, TrainingRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{ActivityType, Training, TrainingDraft, TrainingPatch};
use crate::time_utils::ReportTimeZone;
use chrono::NaiveDate;
use std::sync::Arc;

/// CRUD and filter operations over trainings.
#[derive(Clone)]
pub struct TrainingService {
    db: Arc<dyn Storage>,
    time_zone: ReportTimeZone,
}

impl TrainingService {
    pub fn new(db: Arc<dyn Storage>, time_zone: ReportTimeZone) -> Self {
        Self { db, time_zone }
    }

    pub async fn list_trainings(&self) -> Result<Vec<Training>> {
        self.db.list_trainings().await
    }

    pub async fn get_training(&self, training_id: u64) -> Result<Training> {
        self.db
            .get_training(training_id)
            .await?
            .ok_or_else(|| AppError::training_not_found(training_id))
    }

    /// Trainings owned by an existing user.
    pub async fn for_user(&self, user_id: u64) -> Result<Vec<Training>> {
        self.ensure_user_exists(user_id).await?;
        self.db.trainings_for_user(user_id).await
    }

    /// Trainings that ended after the start of `date`.
    pub async fn finished_after(&self, date: NaiveDate) -> Result<Vec<Training>> {
        let instant = self.time_zone.start_of_day(date).ok_or_else(|| {
            AppError::BadRequest(format!("{} has no midnight in {}", date, self.time_zone))
        })?;
        self.db.trainings_ended_after(instant).await
    }

    pub async fn by_activity(&self, activity_type: ActivityType) -> Result<Vec<Training>> {
        self.db.trainings_by_activity(activity_type).await
    }

    pub async fn create(&self, draft: TrainingDraft) -> Result<Training> {
        self.ensure_user_exists(draft.user_id).await?;

        let training = self.db.insert_training(draft).await?;
        tracing::info!(
            training_id = training.id,
            user_id = training.user_id,
            activity = training.activity_type.display_name(),
            "Created training"
        );
        Ok(training)
    }

    pub async fn update(&self, training_id: u64, patch: TrainingPatch) -> Result<Training> {
        let mut training = self.get_training(training_id).await?;
        training.apply(patch);
        self.db.update_training(&training).await?;

        tracing::info!(training_id, "Updated training");
        Ok(training)
    }

    async fn ensure_user_exists(&self, user_id: u64) -> Result<()> {
        match self.db.get_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::user_not_found(user_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryDb, UserRepository};
    use crate::models::UserDraft;
    use chrono::{DateTime, Utc};

    fn at(raw: &str) -> DateTime<Utc> {
        raw.parse().unwrap()
    }

    async fn setup() -> (TrainingService, u64) {
        let db = Arc::new(MemoryDb::new());
        let user = db
            .insert_user(UserDraft {
                first_name: "Piotr".to_string(),
                last_name: "Zielinski".to_string(),
                birthdate: NaiveDate::from_ymd_opt(1988, 8, 8).unwrap(),
                email: "piotr@x.com".to_string(),
            })
            .await
            .unwrap();
        (TrainingService::new(db, ReportTimeZone::utc()), user.id)
    }

    fn draft(user_id: u64, end: &str) -> TrainingDraft {
        TrainingDraft {
            user_id,
            start_time: Some(at(end) - chrono::Duration::hours(1)),
            end_time: Some(at(end)),
            activity_type: ActivityType::Cycling,
            distance: 30.0,
            average_speed: 25.0,
        }
    }

    #[tokio::test]
    async fn test_create_requires_existing_user() {
        let (trainings, _) = setup().await;
        let err = trainings
            .create(draft(404, "2025-06-01T10:00:00Z"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_for_unknown_user_is_not_found() {
        let (trainings, _) = setup().await;
        assert!(matches!(
            trainings.for_user(404).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_finished_after_uses_start_of_day() {
        let (trainings, user_id) = setup().await;
        trainings
            .create(draft(user_id, "2025-06-09T23:59:59Z"))
            .await
            .unwrap();
        trainings
            .create(draft(user_id, "2025-06-10T00:00:01Z"))
            .await
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let found = trainings.finished_after(date).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].end_time, Some(at("2025-06-10T00:00:01Z")));
    }

    #[tokio::test]
    async fn test_finished_after_includes_fractional_seconds() {
        let (trainings, user_id) = setup().await;
        trainings
            .create(draft(user_id, "2025-06-10T00:00:00.500Z"))
            .await
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let found = trainings.finished_after(date).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].end_time, Some(at("2025-06-10T00:00:00.500Z")));
    }

    #[tokio::test]
    async fn test_update_missing_training_is_not_found() {
        let (trainings, _) = setup().await;
        assert!(matches!(
            trainings
                .update(5, TrainingPatch::default())
                .await
                .unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
