//! Exercise catalog entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cache::ResourceKind;
use crate::domain::storage::Record;
use crate::domain::validation::{validate_name, validate_optional_max_len, FieldError};

const MAX_LABEL_LENGTH: usize = 100;
const MAX_TEXT_LENGTH: usize = 4000;

/// Globally shared exercise definition; has no owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub difficulty_level: Option<String>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            muscle_group: None,
            equipment: None,
            difficulty_level: None,
            instructions: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        validate_name("name", &self.name)?;
        validate_optional_max_len("description", self.description.as_deref(), MAX_TEXT_LENGTH)?;
        validate_optional_max_len("muscle_group", self.muscle_group.as_deref(), MAX_LABEL_LENGTH)?;
        validate_optional_max_len("equipment", self.equipment.as_deref(), MAX_LABEL_LENGTH)?;
        validate_optional_max_len(
            "difficulty_level",
            self.difficulty_level.as_deref(),
            MAX_LABEL_LENGTH,
        )?;
        validate_optional_max_len("instructions", self.instructions.as_deref(), MAX_TEXT_LENGTH)
    }
}

impl Record for Exercise {
    const KIND: ResourceKind = ResourceKind::Exercise;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
