//! Link between a workout and a catalog exercise

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cache::ResourceKind;
use crate::domain::storage::Record;
use crate::domain::validation::{
    validate_max_f64, validate_min, validate_non_negative, validate_non_negative_f64,
    validate_optional_max_len, FieldError,
};

const MAX_NOTES_LENGTH: usize = 2000;

/// Largest value a `NUMERIC(5, 2)` column holds
pub const MAX_WEIGHT_KG: f64 = 999.99;

/// One prescribed exercise inside a workout
///
/// `(workout_id, exercise_id, order_index)` is unique. There is no
/// `updated_at`; the row only records when it was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub sets: i32,
    pub reps: Option<i32>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i32>,
    pub order_index: i32,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WorkoutExercise {
    pub fn new(workout_id: Uuid, exercise_id: Uuid, sets: i32, order_index: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            workout_id,
            exercise_id,
            sets,
            reps: None,
            weight_kg: None,
            duration_seconds: None,
            order_index,
            rest_seconds: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        validate_min("sets", self.sets, 1)?;
        validate_min("order_index", self.order_index, 0)?;
        validate_non_negative("reps", self.reps)?;
        validate_non_negative_f64("weight_kg", self.weight_kg)?;
        validate_max_f64("weight_kg", self.weight_kg, MAX_WEIGHT_KG)?;
        validate_non_negative("duration_seconds", self.duration_seconds)?;
        validate_non_negative("rest_seconds", self.rest_seconds)?;
        validate_optional_max_len("notes", self.notes.as_deref(), MAX_NOTES_LENGTH)
    }

    fn slot(&self) -> (Uuid, Uuid, i32) {
        (self.workout_id, self.exercise_id, self.order_index)
    }
}

impl Record for WorkoutExercise {
    const KIND: ResourceKind = ResourceKind::WorkoutExercise;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn conflicts_with(&self, other: &Self) -> Option<String> {
        (self.slot() == other.slot()).then(|| {
            format!(
                "Exercise '{}' already has order index {} in workout '{}'",
                self.exercise_id, self.order_index, self.workout_id
            )
        })
    }
}
