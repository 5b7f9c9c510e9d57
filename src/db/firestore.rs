// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (directory of registered users)
//! - Trainings (one document per recorded training)
//! - Counters (sequential ID allocation)

use crate::db::{
    collections, TrainingDirectory, TrainingRepository, UserDirectory, UserRepository,
};
use crate::error::AppError;
use crate::models::{ActivityType, Training, TrainingDraft, User, UserDraft};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use firestore::errors::{BackoffError, FirestoreError};
use firestore::FirestoreTimestamp;
use serde::{Deserialize, Serialize};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Last ID handed out for a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IdCounter {
    last_id: u64,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── ID Allocation ───────────────────────────────────────────

    /// Allocate the next sequential ID for a collection.
    ///
    /// The counter read and the incremented write run in one transaction, so
    /// concurrent allocations conflict and are retried instead of sharing an ID.
    async fn allocate_id(&self, collection: &str) -> Result<u64, AppError> {
        let client = self.get_client()?;
        let counter_id = collection.to_string();

        let id = client
            .run_transaction(move |db, transaction| {
                let counter_id = counter_id.clone();
                Box::pin(async move {
                    let current: Option<IdCounter> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::COUNTERS)
                        .obj()
                        .one(&counter_id)
                        .await?;

                    let next = IdCounter {
                        last_id: current.unwrap_or_default().last_id + 1,
                    };

                    db.fluent()
                        .update()
                        .in_col(collections::COUNTERS)
                        .document_id(&counter_id)
                        .object(&next)
                        .add_to_transaction(transaction)?;

                    Ok::<u64, BackoffError<FirestoreError>>(next.last_id)
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Failed to allocate ID: {}", e)))?;

        tracing::debug!(collection, id, "Allocated document ID");

        Ok(id)
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    /// Write a training document.
    async fn put_training(&self, training: &Training) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::TRAININGS)
            .document_id(training.id.to_string())
            .object(training)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Write a user document.
    async fn put_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user.id.to_string())
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

// ─── User Operations ─────────────────────────────────────────

#[async_trait]
impl UserDirectory for FirestoreDb {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .order_by([("id", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl UserRepository for FirestoreDb {
    async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert_user(&self, draft: UserDraft) -> Result<User, AppError> {
        let id = self.allocate_id(collections::USERS).await?;
        let user = User::from_draft(id, draft);
        self.put_user(&user).await?;
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<(), AppError> {
        self.put_user(user).await
    }

    async fn delete_user(&self, user_id: u64) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

// ─── Training Operations ─────────────────────────────────────

#[async_trait]
impl TrainingDirectory for FirestoreDb {
    async fn trainings_for_user(&self, user_id: u64) -> Result<Vec<Training>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id)]))
            .order_by([("id", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl TrainingRepository for FirestoreDb {
    async fn list_trainings(&self) -> Result<Vec<Training>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .order_by([("id", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn get_training(&self, training_id: u64) -> Result<Option<Training>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TRAININGS)
            .obj()
            .one(&training_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn trainings_ended_after(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Training>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .filter(move |q| {
                q.for_all([q
                    .field("end_time")
                    .greater_than(FirestoreTimestamp(instant))])
            })
            .order_by([("end_time", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn trainings_by_activity(
        &self,
        activity_type: ActivityType,
    ) -> Result<Vec<Training>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .filter(move |q| q.for_all([q.field("activity_type").eq(activity_type.as_str())]))
            .order_by([("id", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert_training(&self, draft: TrainingDraft) -> Result<Training, AppError> {
        let id = self.allocate_id(collections::TRAININGS).await?;
        let training = Training::from_draft(id, draft);
        self.put_training(&training).await?;
        Ok(training)
    }

    async fn update_training(&self, training: &Training) -> Result<(), AppError> {
        self.put_training(training).await
    }

    async fn delete_trainings_for_user(&self, user_id: u64) -> Result<usize, AppError> {
        let trainings = self.trainings_for_user(user_id).await?;
        let count = trainings.len();

        self.batch_delete(&trainings, collections::TRAININGS, |training: &Training| {
            training.id.to_string()
        })
        .await?;

        tracing::debug!(user_id, count, "Deleted trainings");
        Ok(count)
    }
}
