//! Training program entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cache::ResourceKind;
use crate::domain::storage::Record;
use crate::domain::validation::{
    validate_name, validate_non_negative, validate_optional_max_len, FieldError,
};

const MAX_DESCRIPTION_LENGTH: usize = 2000;
const MAX_DIFFICULTY_LENGTH: usize = 50;

/// Multi-week plan owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub difficulty: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Program {
    /// New programs start active
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            description: None,
            duration_weeks: None,
            difficulty: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        validate_name("name", &self.name)?;
        validate_optional_max_len("description", self.description.as_deref(), MAX_DESCRIPTION_LENGTH)?;
        validate_non_negative("duration_weeks", self.duration_weeks)?;
        validate_optional_max_len("difficulty", self.difficulty.as_deref(), MAX_DIFFICULTY_LENGTH)
    }
}

impl Record for Program {
    const KIND: ResourceKind = ResourceKind::Program;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
