//! PostgreSQL exercise catalog store

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::pagination::Page;
use crate::domain::storage::RecordStore;
use crate::domain::{DomainError, Exercise};
use crate::infrastructure::storage::{begin, commit, delete_row, map_sqlx_error, ping};

const EXERCISE_COLUMNS: &str = "id, name, description, muscle_group, equipment, difficulty_level, \
     instructions, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresExerciseStore {
    pool: PgPool,
}

impl PostgresExerciseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<Exercise> for PostgresExerciseStore {
    async fn create(&self, exercise: Exercise) -> Result<Exercise, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO exercises (id, name, description, muscle_group, equipment,
                                   difficulty_level, instructions, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(exercise.id)
        .bind(&exercise.name)
        .bind(&exercise.description)
        .bind(&exercise.muscle_group)
        .bind(&exercise.equipment)
        .bind(&exercise.difficulty_level)
        .bind(&exercise.instructions)
        .bind(exercise.created_at)
        .bind(exercise.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create exercise", e))?;

        commit(tx).await?;
        row_to_exercise(&row)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Exercise>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get exercise", e))?;

        row.as_ref().map(row_to_exercise).transpose()
    }

    async fn list(&self, page: Page) -> Result<Vec<Exercise>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list exercises", e))?;

        rows.iter().map(row_to_exercise).collect()
    }

    async fn update(&self, exercise: Exercise) -> Result<Exercise, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE exercises
            SET name = $2, description = $3, muscle_group = $4, equipment = $5,
                difficulty_level = $6, instructions = $7, updated_at = $8
            WHERE id = $1
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(exercise.id)
        .bind(&exercise.name)
        .bind(&exercise.description)
        .bind(&exercise.muscle_group)
        .bind(&exercise.equipment)
        .bind(&exercise.difficulty_level)
        .bind(&exercise.instructions)
        .bind(exercise.updated_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update exercise", e))?;

        let Some(row) = row else {
            return Err(DomainError::not_found(format!(
                "Exercise '{}' not found",
                exercise.id
            )));
        };

        commit(tx).await?;
        row_to_exercise(&row)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        delete_row(&self.pool, "exercises", id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        ping(&self.pool).await
    }
}

fn row_to_exercise(row: &PgRow) -> Result<Exercise, DomainError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode exercise row", e);

    Ok(Exercise {
        id: row.try_get("id").map_err(decode)?,
        name: row.try_get("name").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        muscle_group: row.try_get("muscle_group").map_err(decode)?,
        equipment: row.try_get("equipment").map_err(decode)?,
        difficulty_level: row.try_get("difficulty_level").map_err(decode)?,
        instructions: row.try_get("instructions").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}
