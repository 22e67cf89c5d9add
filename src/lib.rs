//! Fitness tracker API
//!
//! CRUD over users, workouts, exercises, workout exercises, workout sessions
//! and training programs. Reads go through a cache-aside layer in front of
//! the record store; writes commit to the store and then invalidate the
//! affected point and list keys.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
