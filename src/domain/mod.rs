//! Domain layer - entities, store and cache contracts, validation

pub mod cache;
pub mod error;
pub mod fitness;
pub mod pagination;
pub mod storage;
pub mod user;
pub mod validation;

pub use cache::{Cache, CacheExt, CacheKey, ResourceKind};
pub use error::DomainError;
pub use fitness::{Exercise, Program, Workout, WorkoutExercise, WorkoutSession};
pub use pagination::{Page, PageQuery};
pub use storage::{Record, RecordStore};
pub use user::{User, UserStore};
