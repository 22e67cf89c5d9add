//! Logged workout session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cache::ResourceKind;
use crate::domain::storage::Record;
use crate::domain::validation::{
    validate_name, validate_non_negative, validate_optional_max_len, FieldError,
};

const MAX_NOTES_LENGTH: usize = 2000;

/// A session a user performed, optionally following a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_id: Option<Uuid>,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkoutSession {
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            workout_id: None,
            name: name.into(),
            started_at: now,
            completed_at: None,
            duration_minutes: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        validate_name("name", &self.name)?;
        validate_non_negative("duration_minutes", self.duration_minutes)?;
        validate_optional_max_len("notes", self.notes.as_deref(), MAX_NOTES_LENGTH)?;

        if let Some(completed_at) = self.completed_at {
            if completed_at < self.started_at {
                return Err(FieldError::OutOfOrder("completed_at", "started_at"));
            }
        }

        Ok(())
    }
}

impl Record for WorkoutSession {
    const KIND: ResourceKind = ResourceKind::WorkoutSession;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
