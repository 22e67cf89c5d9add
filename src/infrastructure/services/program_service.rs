//! Program service - cached CRUD for training programs

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::cache::Cache;
use crate::domain::pagination::Page;
use crate::domain::storage::RecordStore;
use crate::domain::{DomainError, Program};

use super::cached_records::{parse_id, patch_optional, CachePolicy, CachedRecords};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramRequest {
    pub name: String,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub difficulty: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgramRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub difficulty: Option<String>,
    pub is_active: Option<bool>,
}

/// Program service for CRUD operations
#[derive(Debug)]
pub struct ProgramService {
    records: CachedRecords<Program>,
}

impl ProgramService {
    pub fn new(
        store: Arc<dyn RecordStore<Program>>,
        cache: Arc<dyn Cache>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            records: CachedRecords::new(store, cache, policy),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Program, DomainError> {
        let id = parse_id::<Program>(id)?;
        self.records.get(&id).await
    }

    pub async fn list(&self, page: Page) -> Result<Vec<Program>, DomainError> {
        self.records.list(page).await
    }

    pub async fn create(
        &self,
        owner: Uuid,
        request: CreateProgramRequest,
    ) -> Result<Program, DomainError> {
        let mut program = Program::new(owner, request.name);
        program.description = request.description;
        program.duration_weeks = request.duration_weeks;
        program.difficulty = request.difficulty;
        if let Some(is_active) = request.is_active {
            program.is_active = is_active;
        }
        program.validate()?;

        self.records.create(program).await
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateProgramRequest,
    ) -> Result<Program, DomainError> {
        let id = parse_id::<Program>(id)?;
        let mut program = self.records.fetch_fresh(&id).await?;

        if let Some(name) = request.name {
            program.name = name;
        }

        if let Some(is_active) = request.is_active {
            program.is_active = is_active;
        }

        patch_optional(&mut program.description, request.description);
        patch_optional(&mut program.duration_weeks, request.duration_weeks);
        patch_optional(&mut program.difficulty, request.difficulty);

        program.validate()?;
        program.touch();

        self.records.update(program).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id::<Program>(id)?;
        self.records.delete(&id).await
    }
}
