//! Fitness infrastructure - PostgreSQL stores for the fitness resources

mod exercise_repository;
mod program_repository;
mod workout_exercise_repository;
mod workout_repository;
mod workout_session_repository;

pub use exercise_repository::PostgresExerciseStore;
pub use program_repository::PostgresProgramStore;
pub use workout_exercise_repository::PostgresWorkoutExerciseStore;
pub use workout_repository::PostgresWorkoutStore;
pub use workout_session_repository::PostgresWorkoutSessionStore;
