//! Workout entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cache::ResourceKind;
use crate::domain::storage::Record;
use crate::domain::validation::{
    validate_name, validate_non_negative, validate_optional_max_len, FieldError,
};

const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// A named workout owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub program_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workout {
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            description: None,
            duration_minutes: None,
            program_id: None,
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
        validate_non_negative("duration_minutes", self.duration_minutes)
    }
}

impl Record for Workout {
    const KIND: ResourceKind = ResourceKind::Workout;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workout() {
        let owner = Uuid::new_v4();
        let workout = Workout::new(owner, "Leg Day");

        assert_eq!(workout.user_id, owner);
        assert_eq!(workout.name, "Leg Day");
        assert!(workout.description.is_none());
        assert!(workout.validate().is_ok());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let mut workout = Workout::new(Uuid::new_v4(), "Leg Day");
        workout.duration_minutes = Some(-10);

        assert_eq!(
            workout.validate(),
            Err(FieldError::Negative("duration_minutes"))
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let workout = Workout::new(Uuid::new_v4(), "Leg Day");
        let json = serde_json::to_value(&workout).unwrap();

        assert!(json.get("userId").is_some());
        assert!(json.get("durationMinutes").is_some());
        assert!(json.get("user_id").is_none());
    }
}
