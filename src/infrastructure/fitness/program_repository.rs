//! PostgreSQL training program store

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::pagination::Page;
use crate::domain::storage::RecordStore;
use crate::domain::{DomainError, Program};
use crate::infrastructure::storage::{begin, commit, delete_row, map_sqlx_error, ping};

const PROGRAM_COLUMNS: &str = "id, user_id, name, description, duration_weeks, difficulty, \
     is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresProgramStore {
    pool: PgPool,
}

impl PostgresProgramStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<Program> for PostgresProgramStore {
    async fn create(&self, program: Program) -> Result<Program, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO programs (id, user_id, name, description, duration_weeks, difficulty,
                                  is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PROGRAM_COLUMNS}
            "#
        ))
        .bind(program.id)
        .bind(program.user_id)
        .bind(&program.name)
        .bind(&program.description)
        .bind(program.duration_weeks)
        .bind(&program.difficulty)
        .bind(program.is_active)
        .bind(program.created_at)
        .bind(program.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create program", e))?;

        commit(tx).await?;
        row_to_program(&row)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Program>, DomainError> {
        let row = sqlx::query(&format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get program", e))?;

        row.as_ref().map(row_to_program).transpose()
    }

    async fn list(&self, page: Page) -> Result<Vec<Program>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM programs ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list programs", e))?;

        rows.iter().map(row_to_program).collect()
    }

    async fn update(&self, program: Program) -> Result<Program, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE programs
            SET name = $2, description = $3, duration_weeks = $4, difficulty = $5,
                is_active = $6, updated_at = $7
            WHERE id = $1
            RETURNING {PROGRAM_COLUMNS}
            "#
        ))
        .bind(program.id)
        .bind(&program.name)
        .bind(&program.description)
        .bind(program.duration_weeks)
        .bind(&program.difficulty)
        .bind(program.is_active)
        .bind(program.updated_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update program", e))?;

        let Some(row) = row else {
            return Err(DomainError::not_found(format!("Program '{}' not found", program.id)));
        };

        commit(tx).await?;
        row_to_program(&row)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        delete_row(&self.pool, "programs", id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        ping(&self.pool).await
    }
}

fn row_to_program(row: &PgRow) -> Result<Program, DomainError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode program row", e);

    Ok(Program {
        id: row.try_get("id").map_err(decode)?,
        user_id: row.try_get("user_id").map_err(decode)?,
        name: row.try_get("name").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        duration_weeks: row.try_get("duration_weeks").map_err(decode)?,
        difficulty: row.try_get("difficulty").map_err(decode)?,
        is_active: row.try_get("is_active").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}
