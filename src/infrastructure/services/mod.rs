//! Infrastructure services
//!
//! One service per resource kind, each built on the shared cache-aside
//! wrapper in [`cached_records`].

pub mod cached_records;
mod exercise_service;
mod program_service;
mod workout_exercise_service;
mod workout_service;
mod workout_session_service;

pub use cached_records::{parse_id, patch_optional, CachePolicy, CachedRecords};
pub use exercise_service::{CreateExerciseRequest, ExerciseService, UpdateExerciseRequest};
pub use program_service::{CreateProgramRequest, ProgramService, UpdateProgramRequest};
pub use workout_exercise_service::{
    CreateWorkoutExerciseRequest, UpdateWorkoutExerciseRequest, WorkoutExerciseService,
};
pub use workout_service::{CreateWorkoutRequest, UpdateWorkoutRequest, WorkoutService};
pub use workout_session_service::{
    CreateWorkoutSessionRequest, UpdateWorkoutSessionRequest, WorkoutSessionService,
};
