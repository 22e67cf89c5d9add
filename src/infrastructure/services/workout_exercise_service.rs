//! Workout exercise service - cached CRUD for exercises placed in workouts

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::cache::Cache;
use crate::domain::pagination::Page;
use crate::domain::storage::RecordStore;
use crate::domain::{DomainError, WorkoutExercise};

use super::cached_records::{parse_id, patch_optional, CachePolicy, CachedRecords};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutExerciseRequest {
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub sets: i32,
    pub reps: Option<i32>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i32>,
    #[serde(default)]
    pub order_index: i32,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
}

/// Patch for a workout exercise; moving it to another workout is allowed
/// as long as the slot stays unique
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutExerciseRequest {
    pub workout_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i32>,
    pub order_index: Option<i32>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub struct WorkoutExerciseService {
    records: CachedRecords<WorkoutExercise>,
}

impl WorkoutExerciseService {
    pub fn new(
        store: Arc<dyn RecordStore<WorkoutExercise>>,
        cache: Arc<dyn Cache>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            records: CachedRecords::new(store, cache, policy),
        }
    }

    pub async fn get(&self, id: &str) -> Result<WorkoutExercise, DomainError> {
        let id = parse_id::<WorkoutExercise>(id)?;
        self.records.get(&id).await
    }

    pub async fn list(&self, page: Page) -> Result<Vec<WorkoutExercise>, DomainError> {
        self.records.list(page).await
    }

    pub async fn create(
        &self,
        request: CreateWorkoutExerciseRequest,
    ) -> Result<WorkoutExercise, DomainError> {
        let mut entry = WorkoutExercise::new(
            request.workout_id,
            request.exercise_id,
            request.sets,
            request.order_index,
        );
        entry.reps = request.reps;
        entry.weight_kg = request.weight_kg;
        entry.duration_seconds = request.duration_seconds;
        entry.rest_seconds = request.rest_seconds;
        entry.notes = request.notes;
        entry.validate()?;

        self.records.create(entry).await
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateWorkoutExerciseRequest,
    ) -> Result<WorkoutExercise, DomainError> {
        let id = parse_id::<WorkoutExercise>(id)?;
        let mut entry = self.records.fetch_fresh(&id).await?;

        if let Some(workout_id) = request.workout_id {
            entry.workout_id = workout_id;
        }

        if let Some(exercise_id) = request.exercise_id {
            entry.exercise_id = exercise_id;
        }

        if let Some(sets) = request.sets {
            entry.sets = sets;
        }

        if let Some(order_index) = request.order_index {
            entry.order_index = order_index;
        }

        patch_optional(&mut entry.reps, request.reps);
        patch_optional(&mut entry.weight_kg, request.weight_kg);
        patch_optional(&mut entry.duration_seconds, request.duration_seconds);
        patch_optional(&mut entry.rest_seconds, request.rest_seconds);
        patch_optional(&mut entry.notes, request.notes);

        entry.validate()?;

        self.records.update(entry).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id::<WorkoutExercise>(id)?;
        self.records.delete(&id).await
    }
}
