//! Workout service - cached CRUD for workouts

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::cache::Cache;
use crate::domain::pagination::Page;
use crate::domain::storage::RecordStore;
use crate::domain::{DomainError, Workout};

use super::cached_records::{parse_id, patch_optional, CachePolicy, CachedRecords};

/// Request to create a new workout; the owner comes from the caller
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub program_id: Option<Uuid>,
}

/// Patch for an existing workout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub program_id: Option<Uuid>,
}

/// Workout service for CRUD operations
#[derive(Debug)]
pub struct WorkoutService {
    records: CachedRecords<Workout>,
}

impl WorkoutService {
    pub fn new(
        store: Arc<dyn RecordStore<Workout>>,
        cache: Arc<dyn Cache>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            records: CachedRecords::new(store, cache, policy),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Workout, DomainError> {
        let id = parse_id::<Workout>(id)?;
        self.records.get(&id).await
    }

    pub async fn list(&self, page: Page) -> Result<Vec<Workout>, DomainError> {
        self.records.list(page).await
    }

    pub async fn create(
        &self,
        owner: Uuid,
        request: CreateWorkoutRequest,
    ) -> Result<Workout, DomainError> {
        let mut workout = Workout::new(owner, request.name);
        workout.description = request.description;
        workout.duration_minutes = request.duration_minutes;
        workout.program_id = request.program_id;
        workout.validate()?;

        self.records.create(workout).await
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateWorkoutRequest,
    ) -> Result<Workout, DomainError> {
        let id = parse_id::<Workout>(id)?;
        let mut workout = self.records.fetch_fresh(&id).await?;

        if let Some(name) = request.name {
            workout.name = name;
        }

        patch_optional(&mut workout.description, request.description);
        patch_optional(&mut workout.duration_minutes, request.duration_minutes);
        patch_optional(&mut workout.program_id, request.program_id);

        workout.validate()?;
        workout.touch();

        self.records.update(workout).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id::<Workout>(id)?;
        self.records.delete(&id).await
    }
}
