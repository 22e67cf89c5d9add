//! Fitness domain - workouts, the exercise catalog, sessions and programs

mod exercise;
mod program;
mod workout;
mod workout_exercise;
mod workout_session;

pub use exercise::Exercise;
pub use program::Program;
pub use workout::Workout;
pub use workout_exercise::WorkoutExercise;
pub use workout_session::WorkoutSession;
