//! Record store trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::pagination::Page;

use super::entity::Record;

/// Durable store of one resource kind; the system of record
///
/// Every mutation is atomic: when it returns `Ok` the change is committed.
#[async_trait]
pub trait RecordStore<E>: Send + Sync + Debug
where
    E: Record,
{
    /// Inserts a new record and returns it as stored
    async fn create(&self, record: E) -> Result<E, DomainError>;

    /// Retrieves a record by id
    async fn get(&self, id: &Uuid) -> Result<Option<E>, DomainError>;

    /// Lists records newest first
    async fn list(&self, page: Page) -> Result<Vec<E>, DomainError>;

    /// Replaces an existing record, `NotFound` if absent
    async fn update(&self, record: E) -> Result<E, DomainError>;

    /// Deletes a record by id, returns true if a row was removed
    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError>;

    /// Round-trips to the backend
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
