//! PostgreSQL workout session store

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::pagination::Page;
use crate::domain::storage::RecordStore;
use crate::domain::{DomainError, WorkoutSession};
use crate::infrastructure::storage::{begin, commit, delete_row, map_sqlx_error, ping};

const SESSION_COLUMNS: &str = "id, user_id, workout_id, name, started_at, completed_at, \
     duration_minutes, notes, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresWorkoutSessionStore {
    pool: PgPool,
}

impl PostgresWorkoutSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<WorkoutSession> for PostgresWorkoutSessionStore {
    async fn create(&self, session: WorkoutSession) -> Result<WorkoutSession, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO workout_sessions (id, user_id, workout_id, name, started_at, completed_at,
                                          duration_minutes, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.workout_id)
        .bind(&session.name)
        .bind(session.started_at)
        .bind(session.completed_at)
        .bind(session.duration_minutes)
        .bind(&session.notes)
        .bind(session.created_at)
        .bind(session.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create workout session", e))?;

        commit(tx).await?;
        row_to_session(&row)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<WorkoutSession>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM workout_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get workout session", e))?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn list(&self, page: Page) -> Result<Vec<WorkoutSession>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM workout_sessions ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list workout sessions", e))?;

        rows.iter().map(row_to_session).collect()
    }

    async fn update(&self, session: WorkoutSession) -> Result<WorkoutSession, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE workout_sessions
            SET workout_id = $2, name = $3, started_at = $4, completed_at = $5,
                duration_minutes = $6, notes = $7, updated_at = $8
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session.id)
        .bind(session.workout_id)
        .bind(&session.name)
        .bind(session.started_at)
        .bind(session.completed_at)
        .bind(session.duration_minutes)
        .bind(&session.notes)
        .bind(session.updated_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update workout session", e))?;

        let Some(row) = row else {
            return Err(DomainError::not_found(format!(
                "Workout session '{}' not found",
                session.id
            )));
        };

        commit(tx).await?;
        row_to_session(&row)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        delete_row(&self.pool, "workout_sessions", id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        ping(&self.pool).await
    }
}

fn row_to_session(row: &PgRow) -> Result<WorkoutSession, DomainError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode workout session row", e);

    Ok(WorkoutSession {
        id: row.try_get("id").map_err(decode)?,
        user_id: row.try_get("user_id").map_err(decode)?,
        workout_id: row.try_get("workout_id").map_err(decode)?,
        name: row.try_get("name").map_err(decode)?,
        started_at: row.try_get("started_at").map_err(decode)?,
        completed_at: row.try_get("completed_at").map_err(decode)?,
        duration_minutes: row.try_get("duration_minutes").map_err(decode)?,
        notes: row.try_get("notes").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}
