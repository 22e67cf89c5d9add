//! Resource endpoints under `/api/v1`

pub mod exercises;
pub mod programs;
pub mod users;
pub mod workout_exercises;
pub mod workout_sessions;
pub mod workouts;

use axum::{routing::get, Router};

use super::auth;
use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::create_auth_router())
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/workouts",
            get(workouts::list_workouts).post(workouts::create_workout),
        )
        .route(
            "/workouts/{id}",
            get(workouts::get_workout)
                .put(workouts::update_workout)
                .delete(workouts::delete_workout),
        )
        .route(
            "/exercises",
            get(exercises::list_exercises).post(exercises::create_exercise),
        )
        .route(
            "/exercises/{id}",
            get(exercises::get_exercise)
                .put(exercises::update_exercise)
                .delete(exercises::delete_exercise),
        )
        .route(
            "/workout-exercises",
            get(workout_exercises::list_workout_exercises)
                .post(workout_exercises::create_workout_exercise),
        )
        .route(
            "/workout-exercises/{id}",
            get(workout_exercises::get_workout_exercise)
                .put(workout_exercises::update_workout_exercise)
                .delete(workout_exercises::delete_workout_exercise),
        )
        .route(
            "/workout-sessions",
            get(workout_sessions::list_workout_sessions)
                .post(workout_sessions::create_workout_session),
        )
        .route(
            "/workout-sessions/{id}",
            get(workout_sessions::get_workout_session)
                .put(workout_sessions::update_workout_session)
                .delete(workout_sessions::delete_workout_session),
        )
        .route(
            "/programs",
            get(programs::list_programs).post(programs::create_program),
        )
        .route(
            "/programs/{id}",
            get(programs::get_program)
                .put(programs::update_program)
                .delete(programs::delete_program),
        )
}
