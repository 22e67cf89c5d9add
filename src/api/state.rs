//! Application state for shared services

use std::sync::Arc;

use crate::domain::cache::Cache;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::observability::PrometheusMetrics;
use crate::infrastructure::services::{
    CachePolicy, ExerciseService, ProgramService, WorkoutExerciseService, WorkoutService,
    WorkoutSessionService,
};
use crate::infrastructure::storage::Stores;
use crate::infrastructure::user::{PasswordHasher, UserService};

/// Composition root handed to every handler
///
/// All services share one cache handle and one store backend; both are
/// injected here rather than reached through globals.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub workouts: Arc<WorkoutService>,
    pub exercises: Arc<ExerciseService>,
    pub workout_exercises: Arc<WorkoutExerciseService>,
    pub workout_sessions: Arc<WorkoutSessionService>,
    pub programs: Arc<ProgramService>,
    pub jwt: Arc<dyn JwtGenerator>,
    pub stores: Stores,
    pub cache: Arc<dyn Cache>,
    pub metrics: Option<PrometheusMetrics>,
}

impl AppState {
    pub fn new(
        stores: Stores,
        cache: Arc<dyn Cache>,
        hasher: Arc<dyn PasswordHasher>,
        jwt: Arc<dyn JwtGenerator>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(
                stores.users.clone(),
                cache.clone(),
                hasher,
                policy,
            )),
            workouts: Arc::new(WorkoutService::new(
                stores.workouts.clone(),
                cache.clone(),
                policy,
            )),
            exercises: Arc::new(ExerciseService::new(
                stores.exercises.clone(),
                cache.clone(),
                policy,
            )),
            workout_exercises: Arc::new(WorkoutExerciseService::new(
                stores.workout_exercises.clone(),
                cache.clone(),
                policy,
            )),
            workout_sessions: Arc::new(WorkoutSessionService::new(
                stores.workout_sessions.clone(),
                cache.clone(),
                policy,
            )),
            programs: Arc::new(ProgramService::new(
                stores.programs.clone(),
                cache.clone(),
                policy,
            )),
            jwt,
            stores,
            cache,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Option<PrometheusMetrics>) -> Self {
        self.metrics = metrics;
        self
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory state for router tests

    use super::*;
    use crate::domain::User;
    use crate::infrastructure::auth::{JwtConfig, JwtService};
    use crate::infrastructure::cache::InMemoryCache;
    use crate::infrastructure::user::Argon2Hasher;

    pub const TEST_SECRET: &str = "router-test-secret-with-at-least-32-bytes";

    pub fn in_memory_state() -> AppState {
        state_with_cache(Arc::new(InMemoryCache::new()))
    }

    pub fn state_with_cache(cache: Arc<dyn Cache>) -> AppState {
        AppState::new(
            Stores::in_memory(),
            cache,
            Arc::new(Argon2Hasher::new()),
            Arc::new(JwtService::new(JwtConfig::new(TEST_SECRET, 1))),
            CachePolicy::default(),
        )
    }

    /// Bearer header value for a user that need not exist in the store
    pub fn bearer_for(state: &AppState, user: &User) -> String {
        let issued = state.jwt.generate(user).unwrap();
        format!("Bearer {}", issued.token)
    }
}
