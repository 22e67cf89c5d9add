//! PostgreSQL workout store

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::pagination::Page;
use crate::domain::storage::RecordStore;
use crate::domain::{DomainError, Workout};
use crate::infrastructure::storage::{begin, commit, delete_row, map_sqlx_error, ping};

const WORKOUT_COLUMNS: &str =
    "id, user_id, name, description, duration_minutes, program_id, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresWorkoutStore {
    pool: PgPool,
}

impl PostgresWorkoutStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<Workout> for PostgresWorkoutStore {
    async fn create(&self, workout: Workout) -> Result<Workout, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO workouts (id, user_id, name, description, duration_minutes, program_id,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(workout.id)
        .bind(workout.user_id)
        .bind(&workout.name)
        .bind(&workout.description)
        .bind(workout.duration_minutes)
        .bind(workout.program_id)
        .bind(workout.created_at)
        .bind(workout.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create workout", e))?;

        commit(tx).await?;
        row_to_workout(&row)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Workout>, DomainError> {
        let row = sqlx::query(&format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get workout", e))?;

        row.as_ref().map(row_to_workout).transpose()
    }

    async fn list(&self, page: Page) -> Result<Vec<Workout>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list workouts", e))?;

        rows.iter().map(row_to_workout).collect()
    }

    async fn update(&self, workout: Workout) -> Result<Workout, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE workouts
            SET name = $2, description = $3, duration_minutes = $4, program_id = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(workout.id)
        .bind(&workout.name)
        .bind(&workout.description)
        .bind(workout.duration_minutes)
        .bind(workout.program_id)
        .bind(workout.updated_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update workout", e))?;

        let Some(row) = row else {
            return Err(DomainError::not_found(format!("Workout '{}' not found", workout.id)));
        };

        commit(tx).await?;
        row_to_workout(&row)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        delete_row(&self.pool, "workouts", id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        ping(&self.pool).await
    }
}

fn row_to_workout(row: &PgRow) -> Result<Workout, DomainError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode workout row", e);

    Ok(Workout {
        id: row.try_get("id").map_err(decode)?,
        user_id: row.try_get("user_id").map_err(decode)?,
        name: row.try_get("name").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        duration_minutes: row.try_get("duration_minutes").map_err(decode)?,
        program_id: row.try_get("program_id").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}
