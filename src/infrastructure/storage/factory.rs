//! Record store factory for runtime backend selection

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::domain::storage::RecordStore;
use crate::domain::user::UserStore;
use crate::domain::{DomainError, Exercise, Program, Workout, WorkoutExercise, WorkoutSession};
use crate::infrastructure::fitness::{
    PostgresExerciseStore, PostgresProgramStore, PostgresWorkoutExerciseStore,
    PostgresWorkoutSessionStore, PostgresWorkoutStore,
};
use crate::infrastructure::user::PostgresUserStore;

use super::in_memory::InMemoryRecordStore;
use super::migrations::run_storage_migrations;
use super::postgres::{connect, PostgresConfig};

/// One store handle per resource kind, all sharing one backend
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub workouts: Arc<dyn RecordStore<Workout>>,
    pub exercises: Arc<dyn RecordStore<Exercise>>,
    pub workout_exercises: Arc<dyn RecordStore<WorkoutExercise>>,
    pub workout_sessions: Arc<dyn RecordStore<WorkoutSession>>,
    pub programs: Arc<dyn RecordStore<Program>>,
}

impl Stores {
    /// Fresh in-memory stores
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryRecordStore::<crate::domain::User>::new()),
            workouts: Arc::new(InMemoryRecordStore::<Workout>::new()),
            exercises: Arc::new(InMemoryRecordStore::<Exercise>::new()),
            workout_exercises: Arc::new(InMemoryRecordStore::<WorkoutExercise>::new()),
            workout_sessions: Arc::new(InMemoryRecordStore::<WorkoutSession>::new()),
            programs: Arc::new(InMemoryRecordStore::<Program>::new()),
        }
    }

    /// PostgreSQL stores sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserStore::new(pool.clone())),
            workouts: Arc::new(PostgresWorkoutStore::new(pool.clone())),
            exercises: Arc::new(PostgresExerciseStore::new(pool.clone())),
            workout_exercises: Arc::new(PostgresWorkoutExerciseStore::new(pool.clone())),
            workout_sessions: Arc::new(PostgresWorkoutSessionStore::new(pool.clone())),
            programs: Arc::new(PostgresProgramStore::new(pool)),
        }
    }

    /// Round-trips to the shared backend
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.users.ping().await
    }
}

/// Factory for creating record stores
#[derive(Debug)]
pub struct StoreFactory;

impl StoreFactory {
    /// Builds the stores selected by `database.backend`
    ///
    /// For PostgreSQL this opens the pool and, when `run_migrations` is set,
    /// applies pending migrations before returning.
    pub async fn create(config: &DatabaseConfig) -> Result<Stores, DomainError> {
        match config.backend {
            DatabaseBackend::InMemory => {
                info!("Using in-memory record stores");
                Ok(Stores::in_memory())
            }
            DatabaseBackend::Postgres => {
                let pool = connect(&PostgresConfig::from(config)).await?;
                info!(
                    max_connections = config.max_connections,
                    "Connected to PostgreSQL"
                );

                if config.run_migrations {
                    let applied = run_storage_migrations(&pool).await?;
                    info!(applied, "Database migrations up to date");
                }

                Ok(Stores::postgres(pool))
            }
        }
    }
}
