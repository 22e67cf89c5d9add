//! Workout session service - cached CRUD for performed sessions

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::cache::Cache;
use crate::domain::pagination::Page;
use crate::domain::storage::RecordStore;
use crate::domain::{DomainError, WorkoutSession};

use super::cached_records::{parse_id, patch_optional, CachePolicy, CachedRecords};

/// Request to log a session; `started_at` defaults to now
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutSessionRequest {
    pub name: String,
    pub workout_id: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutSessionRequest {
    pub name: Option<String>,
    pub workout_id: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub struct WorkoutSessionService {
    records: CachedRecords<WorkoutSession>,
}

impl WorkoutSessionService {
    pub fn new(
        store: Arc<dyn RecordStore<WorkoutSession>>,
        cache: Arc<dyn Cache>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            records: CachedRecords::new(store, cache, policy),
        }
    }

    pub async fn get(&self, id: &str) -> Result<WorkoutSession, DomainError> {
        let id = parse_id::<WorkoutSession>(id)?;
        self.records.get(&id).await
    }

    pub async fn list(&self, page: Page) -> Result<Vec<WorkoutSession>, DomainError> {
        self.records.list(page).await
    }

    pub async fn create(
        &self,
        owner: Uuid,
        request: CreateWorkoutSessionRequest,
    ) -> Result<WorkoutSession, DomainError> {
        let mut session = WorkoutSession::new(owner, request.name);
        session.workout_id = request.workout_id;
        if let Some(started_at) = request.started_at {
            session.started_at = started_at;
        }
        session.completed_at = request.completed_at;
        session.duration_minutes = request.duration_minutes;
        session.notes = request.notes;
        session.validate()?;

        self.records.create(session).await
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateWorkoutSessionRequest,
    ) -> Result<WorkoutSession, DomainError> {
        let id = parse_id::<WorkoutSession>(id)?;
        let mut session = self.records.fetch_fresh(&id).await?;

        if let Some(name) = request.name {
            session.name = name;
        }

        if let Some(started_at) = request.started_at {
            session.started_at = started_at;
        }

        patch_optional(&mut session.workout_id, request.workout_id);
        patch_optional(&mut session.completed_at, request.completed_at);
        patch_optional(&mut session.duration_minutes, request.duration_minutes);
        patch_optional(&mut session.notes, request.notes);

        session.validate()?;
        session.touch();

        self.records.update(session).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id::<WorkoutSession>(id)?;
        self.records.delete(&id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::cache::MockCache;
    use crate::infrastructure::storage::InMemoryRecordStore;

    fn create_service() -> WorkoutSessionService {
        WorkoutSessionService::new(
            Arc::new(InMemoryRecordStore::<WorkoutSession>::new()),
            Arc::new(MockCache::new()),
            CachePolicy::default(),
        )
    }

    fn morning_run() -> CreateWorkoutSessionRequest {
        CreateWorkoutSessionRequest {
            name: "Morning run".to_string(),
            workout_id: None,
            started_at: None,
            completed_at: None,
            duration_minutes: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_started_at_defaults_to_now() {
        let service = create_service();
        let before = Utc::now();

        let session = service.create(Uuid::new_v4(), morning_run()).await.unwrap();

        assert!(session.started_at >= before);
        assert!(session.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_completed_before_start_rejected() {
        let service = create_service();
        let started = Utc::now();
        let mut request = morning_run();
        request.started_at = Some(started);
        request.completed_at = Some(started - Duration::minutes(5));

        let result = service.create(Uuid::new_v4(), request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_complete_session() {
        let service = create_service();
        let session = service.create(Uuid::new_v4(), morning_run()).await.unwrap();
        let id = session.id.to_string();
        service.get(&id).await.unwrap();

        let completed_at = session.started_at + Duration::minutes(32);
        let updated = service
            .update(
                &id,
                UpdateWorkoutSessionRequest {
                    completed_at: Some(completed_at),
                    duration_minutes: Some(32),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.completed_at, Some(completed_at));
        assert_eq!(service.get(&id).await.unwrap().duration_minutes, Some(32));
    }

    #[tokio::test]
    async fn test_moving_start_past_completion_rejected() {
        let service = create_service();
        let started = Utc::now();
        let mut request = morning_run();
        request.started_at = Some(started);
        request.completed_at = Some(started + Duration::minutes(30));
        let session = service.create(Uuid::new_v4(), request).await.unwrap();

        let result = service
            .update(
                &session.id.to_string(),
                UpdateWorkoutSessionRequest {
                    started_at: Some(started + Duration::hours(1)),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
