//! User store trait definition

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::storage::RecordStore;

use super::entity::User;

/// Record store for users with the lookup needed by login
#[async_trait]
pub trait UserStore: RecordStore<User> {
    /// Finds a user by email, case-insensitively, including the password hash
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}
