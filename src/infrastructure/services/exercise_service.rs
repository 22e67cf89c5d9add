//! Exercise service - cached CRUD for the shared exercise catalog

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::cache::Cache;
use crate::domain::pagination::Page;
use crate::domain::storage::RecordStore;
use crate::domain::{DomainError, Exercise};

use super::cached_records::{parse_id, patch_optional, CachePolicy, CachedRecords};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub difficulty_level: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub difficulty_level: Option<String>,
    pub instructions: Option<String>,
}

/// Exercise service for CRUD operations
#[derive(Debug)]
pub struct ExerciseService {
    records: CachedRecords<Exercise>,
}

impl ExerciseService {
    pub fn new(
        store: Arc<dyn RecordStore<Exercise>>,
        cache: Arc<dyn Cache>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            records: CachedRecords::new(store, cache, policy),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Exercise, DomainError> {
        let id = parse_id::<Exercise>(id)?;
        self.records.get(&id).await
    }

    pub async fn list(&self, page: Page) -> Result<Vec<Exercise>, DomainError> {
        self.records.list(page).await
    }

    pub async fn create(&self, request: CreateExerciseRequest) -> Result<Exercise, DomainError> {
        let mut exercise = Exercise::new(request.name);
        exercise.description = request.description;
        exercise.muscle_group = request.muscle_group;
        exercise.equipment = request.equipment;
        exercise.difficulty_level = request.difficulty_level;
        exercise.instructions = request.instructions;
        exercise.validate()?;

        self.records.create(exercise).await
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateExerciseRequest,
    ) -> Result<Exercise, DomainError> {
        let id = parse_id::<Exercise>(id)?;
        let mut exercise = self.records.fetch_fresh(&id).await?;

        if let Some(name) = request.name {
            exercise.name = name;
        }

        patch_optional(&mut exercise.description, request.description);
        patch_optional(&mut exercise.muscle_group, request.muscle_group);
        patch_optional(&mut exercise.equipment, request.equipment);
        patch_optional(&mut exercise.difficulty_level, request.difficulty_level);
        patch_optional(&mut exercise.instructions, request.instructions);

        exercise.validate()?;
        exercise.touch();

        self.records.update(exercise).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id::<Exercise>(id)?;
        self.records.delete(&id).await
    }
}
