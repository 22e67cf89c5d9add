//! PostgreSQL store for exercises prescribed inside workouts

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::pagination::Page;
use crate::domain::storage::RecordStore;
use crate::domain::{DomainError, WorkoutExercise};
use crate::infrastructure::storage::{begin, commit, delete_row, map_sqlx_error, ping};

// weight_kg is NUMERIC(5,2); read it back as float8
const LINK_COLUMNS: &str = "id, workout_id, exercise_id, sets, reps, weight_kg::float8 AS weight_kg, \
     duration_seconds, order_index, rest_seconds, notes, created_at";

#[derive(Debug, Clone)]
pub struct PostgresWorkoutExerciseStore {
    pool: PgPool,
}

impl PostgresWorkoutExerciseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<WorkoutExercise> for PostgresWorkoutExerciseStore {
    async fn create(&self, link: WorkoutExercise) -> Result<WorkoutExercise, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO workout_exercises (id, workout_id, exercise_id, sets, reps, weight_kg,
                                           duration_seconds, order_index, rest_seconds, notes,
                                           created_at)
            VALUES ($1, $2, $3, $4, $5, $6::numeric, $7, $8, $9, $10, $11)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(link.id)
        .bind(link.workout_id)
        .bind(link.exercise_id)
        .bind(link.sets)
        .bind(link.reps)
        .bind(link.weight_kg)
        .bind(link.duration_seconds)
        .bind(link.order_index)
        .bind(link.rest_seconds)
        .bind(&link.notes)
        .bind(link.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| slot_error(map_sqlx_error("create workout exercise", e), &link))?;

        commit(tx).await?;
        row_to_link(&row)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<WorkoutExercise>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {LINK_COLUMNS} FROM workout_exercises WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get workout exercise", e))?;

        row.as_ref().map(row_to_link).transpose()
    }

    async fn list(&self, page: Page) -> Result<Vec<WorkoutExercise>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {LINK_COLUMNS} FROM workout_exercises ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list workout exercises", e))?;

        rows.iter().map(row_to_link).collect()
    }

    async fn update(&self, link: WorkoutExercise) -> Result<WorkoutExercise, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE workout_exercises
            SET workout_id = $2, exercise_id = $3, sets = $4, reps = $5, weight_kg = $6::numeric,
                duration_seconds = $7, order_index = $8, rest_seconds = $9, notes = $10
            WHERE id = $1
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(link.id)
        .bind(link.workout_id)
        .bind(link.exercise_id)
        .bind(link.sets)
        .bind(link.reps)
        .bind(link.weight_kg)
        .bind(link.duration_seconds)
        .bind(link.order_index)
        .bind(link.rest_seconds)
        .bind(&link.notes)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| slot_error(map_sqlx_error("update workout exercise", e), &link))?;

        let Some(row) = row else {
            return Err(DomainError::not_found(format!(
                "Workout exercise '{}' not found",
                link.id
            )));
        };

        commit(tx).await?;
        row_to_link(&row)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        delete_row(&self.pool, "workout_exercises", id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        ping(&self.pool).await
    }
}

fn slot_error(err: DomainError, link: &WorkoutExercise) -> DomainError {
    match err {
        DomainError::Conflict { .. } => DomainError::conflict(format!(
            "Exercise '{}' already has order index {} in workout '{}'",
            link.exercise_id, link.order_index, link.workout_id
        )),
        other => other,
    }
}

fn row_to_link(row: &PgRow) -> Result<WorkoutExercise, DomainError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode workout exercise row", e);

    Ok(WorkoutExercise {
        id: row.try_get("id").map_err(decode)?,
        workout_id: row.try_get("workout_id").map_err(decode)?,
        exercise_id: row.try_get("exercise_id").map_err(decode)?,
        sets: row.try_get("sets").map_err(decode)?,
        reps: row.try_get("reps").map_err(decode)?,
        weight_kg: row.try_get("weight_kg").map_err(decode)?,
        duration_seconds: row.try_get("duration_seconds").map_err(decode)?,
        order_index: row.try_get("order_index").map_err(decode)?,
        rest_seconds: row.try_get("rest_seconds").map_err(decode)?,
        notes: row.try_get("notes").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
    })
}
