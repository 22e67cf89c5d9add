//! User infrastructure module
//!
//! Argon2 password hashing, the PostgreSQL user store and the user service.

mod password;
mod postgres_repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserStore;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
