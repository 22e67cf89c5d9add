//! Database migrations infrastructure

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Executor as _;
use tracing::info;

use crate::domain::DomainError;

use super::postgres::map_sqlx_error;

/// Trait for running database migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations, returning how many were applied
    async fn run(&self) -> Result<usize, DomainError>;

    /// Reverts the last applied migration, if any
    async fn revert(&self) -> Result<Option<i64>, DomainError>;

    /// Returns the current migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// Applied state of one known migration
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

/// PostgreSQL migrator over an ordered, embedded migration list
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
    migrations: Vec<Migration>,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self::with_migrations(pool, storage_migrations())
    }

    pub fn with_migrations(pool: PgPool, migrations: Vec<Migration>) -> Self {
        Self { pool, migrations }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                success BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create migrations table", e))?;

        Ok(())
    }

    /// Applies a single migration and its bookkeeping row in one transaction
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin migration", e))?;

        tx.execute(sqlx::raw_sql(&migration.up))
            .await
            .map_err(|e| map_sqlx_error(&format!("run migration {}", migration.version), e))?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(&format!("record migration {}", migration.version), e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit migration", e))?;

        info!(
            version = migration.version,
            description = %migration.description,
            "Applied migration"
        );

        Ok(true)
    }

    /// Reverts a single migration and removes its bookkeeping row
    pub async fn revert_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if !self.is_applied(migration.version).await? {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin revert", e))?;

        tx.execute(sqlx::raw_sql(&migration.down))
            .await
            .map_err(|e| map_sqlx_error(&format!("revert migration {}", migration.version), e))?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_sqlx_error(&format!("remove migration record {}", migration.version), e)
            })?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit revert", e))?;

        info!(
            version = migration.version,
            description = %migration.description,
            "Reverted migration"
        );

        Ok(true)
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("check migration status", e))
    }

    /// Returns all applied migration versions
    pub async fn applied_versions(&self) -> Result<Vec<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT version FROM _migrations WHERE success = TRUE ORDER BY version")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get applied migrations", e))
    }

    /// Every known migration with whether it has been applied
    pub async fn status(&self) -> Result<Vec<MigrationStatus>, DomainError> {
        let applied = self.applied_versions().await?;
        Ok(pending_status(&self.migrations, &applied))
    }
}

#[async_trait]
impl Migrator for PostgresMigrator {
    async fn run(&self) -> Result<usize, DomainError> {
        let mut applied = 0;

        for migration in &self.migrations {
            if self.run_migration(migration).await? {
                applied += 1;
            }
        }

        Ok(applied)
    }

    async fn revert(&self) -> Result<Option<i64>, DomainError> {
        let Some(latest) = self.version().await? else {
            return Ok(None);
        };

        let migration = self
            .migrations
            .iter()
            .find(|m| m.version == latest)
            .ok_or_else(|| {
                DomainError::internal(format!("Applied migration {} is unknown", latest))
            })?;

        self.revert_migration(migration).await?;
        Ok(Some(latest))
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations WHERE success = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get migration version", e))
    }
}

fn pending_status(migrations: &[Migration], applied: &[i64]) -> Vec<MigrationStatus> {
    migrations
        .iter()
        .map(|m| MigrationStatus {
            version: m.version,
            description: m.description.clone(),
            applied: applied.contains(&m.version),
        })
        .collect()
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version, strictly increasing
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// Schema for every resource table, in dependency order
pub fn storage_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email VARCHAR(255) NOT NULL UNIQUE,
                username VARCHAR(50) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                first_name VARCHAR(100),
                last_name VARCHAR(100),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at);
            "#,
            r#"
            DROP TABLE IF EXISTS users;
            "#,
        ),
        Migration::new(
            2,
            "Create programs table",
            r#"
            CREATE TABLE IF NOT EXISTS programs (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name VARCHAR(255) NOT NULL,
                description TEXT,
                duration_weeks INTEGER CHECK (duration_weeks >= 0),
                difficulty VARCHAR(50),
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_programs_user_id ON programs(user_id);
            CREATE INDEX IF NOT EXISTS idx_programs_created_at ON programs(created_at);
            "#,
            r#"
            DROP TABLE IF EXISTS programs;
            "#,
        ),
        Migration::new(
            3,
            "Create workouts table",
            r#"
            CREATE TABLE IF NOT EXISTS workouts (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name VARCHAR(255) NOT NULL,
                description TEXT,
                duration_minutes INTEGER CHECK (duration_minutes >= 0),
                program_id UUID REFERENCES programs(id) ON DELETE SET NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_workouts_user_id ON workouts(user_id);
            CREATE INDEX IF NOT EXISTS idx_workouts_created_at ON workouts(created_at);
            "#,
            r#"
            DROP TABLE IF EXISTS workouts;
            "#,
        ),
        Migration::new(
            4,
            "Create exercises table",
            r#"
            CREATE TABLE IF NOT EXISTS exercises (
                id UUID PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                description TEXT,
                muscle_group VARCHAR(100),
                equipment VARCHAR(100),
                difficulty_level VARCHAR(100),
                instructions TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_exercises_created_at ON exercises(created_at);
            "#,
            r#"
            DROP TABLE IF EXISTS exercises;
            "#,
        ),
        Migration::new(
            5,
            "Create workout_exercises table",
            r#"
            CREATE TABLE IF NOT EXISTS workout_exercises (
                id UUID PRIMARY KEY,
                workout_id UUID NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                exercise_id UUID NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
                sets INTEGER NOT NULL CHECK (sets >= 1),
                reps INTEGER CHECK (reps >= 0),
                weight_kg NUMERIC(5, 2) CHECK (weight_kg >= 0),
                duration_seconds INTEGER CHECK (duration_seconds >= 0),
                order_index INTEGER NOT NULL CHECK (order_index >= 0),
                rest_seconds INTEGER CHECK (rest_seconds >= 0),
                notes TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT workout_exercises_slot_key UNIQUE (workout_id, exercise_id, order_index)
            );
            CREATE INDEX IF NOT EXISTS idx_workout_exercises_workout_id ON workout_exercises(workout_id);
            CREATE INDEX IF NOT EXISTS idx_workout_exercises_created_at ON workout_exercises(created_at);
            "#,
            r#"
            DROP TABLE IF EXISTS workout_exercises;
            "#,
        ),
        Migration::new(
            6,
            "Create workout_sessions table",
            r#"
            CREATE TABLE IF NOT EXISTS workout_sessions (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                workout_id UUID REFERENCES workouts(id) ON DELETE SET NULL,
                name VARCHAR(255) NOT NULL,
                started_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                completed_at TIMESTAMPTZ,
                duration_minutes INTEGER CHECK (duration_minutes >= 0),
                notes TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CHECK (completed_at IS NULL OR completed_at >= started_at)
            );
            CREATE INDEX IF NOT EXISTS idx_workout_sessions_user_id ON workout_sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_workout_sessions_created_at ON workout_sessions(created_at);
            "#,
            r#"
            DROP TABLE IF EXISTS workout_sessions;
            "#,
        ),
        Migration::new(
            7,
            "Enforce case-insensitive user email uniqueness",
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS users_email_lower_key ON users (LOWER(email));
            "#,
            r#"
            DROP INDEX IF EXISTS users_email_lower_key;
            "#,
        ),
    ]
}

/// Runs all pending storage migrations
pub async fn run_storage_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    PostgresMigrator::new(pool.clone()).run().await
}
