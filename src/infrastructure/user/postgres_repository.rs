//! PostgreSQL user store implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::pagination::Page;
use crate::domain::storage::RecordStore;
use crate::domain::user::{User, UserStore};
use crate::domain::DomainError;
use crate::infrastructure::storage::{begin, commit, delete_row, map_sqlx_error, ping};

const USER_COLUMNS: &str =
    "id, email, username, password_hash, first_name, last_name, created_at, updated_at";

/// PostgreSQL implementation of UserStore
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<User> for PostgresUserStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, email, username, password_hash, first_name, last_name,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(user.password_hash())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_user_error(map_sqlx_error("create user", e), &user))?;

        commit(tx).await?;

        row_to_user(&row)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get user", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list users", e))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET email = $2, username = $3, password_hash = $4, first_name = $5,
                last_name = $6, updated_at = $7
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(user.password_hash())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.updated_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| unique_user_error(map_sqlx_error("update user", e), &user))?;

        let Some(row) = row else {
            return Err(DomainError::not_found(format!("User '{}' not found", user.id)));
        };

        commit(tx).await?;

        row_to_user(&row)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        delete_row(&self.pool, "users", id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        ping(&self.pool).await
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get user by email", e))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

/// Names the offending field when the violated constraint is known
fn unique_user_error(err: DomainError, user: &User) -> DomainError {
    match err {
        DomainError::Conflict { message } if message.contains("email") => {
            DomainError::conflict(format!("Email '{}' is already registered", user.email))
        }
        DomainError::Conflict { message } if message.contains("username") => {
            DomainError::conflict(format!("Username '{}' already exists", user.username))
        }
        other => other,
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode user row", e);

    Ok(User::from_parts(
        row.try_get("id").map_err(decode)?,
        row.try_get("email").map_err(decode)?,
        row.try_get("username").map_err(decode)?,
        row.try_get("password_hash").map_err(decode)?,
        row.try_get("first_name").map_err(decode)?,
        row.try_get("last_name").map_err(decode)?,
        row.try_get("created_at").map_err(decode)?,
        row.try_get("updated_at").map_err(decode)?,
    ))
}
