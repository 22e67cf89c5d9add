//! Storage infrastructure - record store implementations

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{StoreFactory, Stores};
pub use in_memory::InMemoryRecordStore;
pub use migrations::{run_storage_migrations, Migration, MigrationStatus, Migrator, PostgresMigrator};
pub use postgres::{begin, commit, connect, delete_row, map_sqlx_error, ping, PostgresConfig};
