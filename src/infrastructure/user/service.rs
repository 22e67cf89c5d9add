//! User service for account management and authentication

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::domain::cache::Cache;
use crate::domain::pagination::Page;
use crate::domain::storage::Record;
use crate::domain::user::{validate_password, User, UserStore};
use crate::domain::DomainError;
use crate::infrastructure::services::{parse_id, patch_optional, CachePolicy, CachedRecords};

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Patch for an existing user; a present password is re-hashed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// User service for authentication and management
#[derive(Debug)]
pub struct UserService {
    records: CachedRecords<User, dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(
        store: Arc<dyn UserStore>,
        cache: Arc<dyn Cache>,
        hasher: Arc<dyn PasswordHasher>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            records: CachedRecords::new(store, cache, policy),
            hasher,
        }
    }

    /// Register a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(request.email, request.username, password_hash)
            .with_names(request.first_name, request.last_name);

        user.validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.records.create(user).await
    }

    /// Checks credentials against the stored hash
    ///
    /// Unknown emails and wrong passwords fail the same way.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .records
            .store_call("find_by_email", self.records.store().find_by_email(email))
            .await?;

        match user {
            Some(user) if self.hasher.verify(password, user.password_hash()) => {
                Ok(user.redacted())
            }
            Some(_) => {
                debug!(email, "Rejected login with wrong password");
                Err(invalid_credentials())
            }
            None => {
                debug!(email, "Rejected login for unknown email");
                Err(invalid_credentials())
            }
        }
    }

    pub async fn get(&self, id: &str) -> Result<User, DomainError> {
        let id = parse_id::<User>(id)?;
        self.records.get(&id).await
    }

    pub async fn list(&self, page: Page) -> Result<Vec<User>, DomainError> {
        self.records.list(page).await
    }

    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError> {
        let id = parse_id::<User>(id)?;
        let mut user = self.records.fetch_fresh(&id).await?;

        if let Some(email) = request.email {
            user.email = email;
        }

        if let Some(username) = request.username {
            user.username = username;
        }

        patch_optional(&mut user.first_name, request.first_name);
        patch_optional(&mut user.last_name, request.last_name);

        user.validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if let Some(password) = request.password {
            validate_password(&password).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_password_hash(self.hasher.hash(&password)?);
        }

        user.touch();

        self.records.update(user).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id::<User>(id)?;
        self.records.delete(&id).await
    }
}

fn invalid_credentials() -> DomainError {
    DomainError::unauthorized("Invalid credentials")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use crate::infrastructure::storage::InMemoryRecordStore;
    use crate::infrastructure::user::password::Argon2Hasher;

    struct Fixture {
        service: UserService,
        store: Arc<InMemoryRecordStore<User>>,
        cache: Arc<MockCache>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryRecordStore::<User>::new());
        let cache = Arc::new(MockCache::new());
        let service = UserService::new(
            store.clone(),
            cache.clone(),
            Arc::new(Argon2Hasher::new()),
            CachePolicy::default(),
        );

        Fixture {
            service,
            store,
            cache,
        }
    }

    fn jane() -> CreateUserRequest {
        CreateUserRequest {
            email: "jane@example.com".to_string(),
            username: "jane".to_string(),
            password: "correct-horse".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let f = fixture();

        let user = f.service.create(jane()).await.unwrap();

        assert!(user.password_hash().is_empty());
        let stored = crate::domain::storage::RecordStore::get(f.store.as_ref(), &user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.password_hash().starts_with("$argon2"));
        assert_ne!(stored.password_hash(), "correct-horse");
    }

    #[tokio::test]
    async fn test_create_rejects_short_password() {
        let f = fixture();
        let mut request = jane();
        request.password = "short".to_string();

        let result = f.service.create(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let f = fixture();
        let mut request = jane();
        request.email = "jane-at-example".to_string();

        let result = f.service.create(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let f = fixture();
        f.service.create(jane()).await.unwrap();

        let mut request = jane();
        request.username = "jane2".to_string();
        request.email = "JANE@example.com".to_string();

        let result = f.service.create(request).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_cached_user_has_no_hash() {
        let f = fixture();
        let user = f.service.create(jane()).await.unwrap();

        f.service.get(&user.id.to_string()).await.unwrap();
        f.service.list(Page::default()).await.unwrap();

        for key in f.cache.keys() {
            let raw = f.cache.get_raw(&key).await.unwrap().unwrap();
            assert!(!raw.contains("argon2"), "{} carries a hash", key);
            assert!(!raw.contains("passwordHash"));
        }
    }

    #[tokio::test]
    async fn test_authenticate() {
        let f = fixture();
        let user = f.service.create(jane()).await.unwrap();

        // Warm the cache so login must not rely on it
        f.service.get(&user.id.to_string()).await.unwrap();

        let logged_in = f
            .service
            .authenticate("Jane@Example.com", "correct-horse")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(logged_in.password_hash().is_empty());
    }

    #[tokio::test]
    async fn test_authenticate_failures_look_the_same() {
        let f = fixture();
        f.service.create(jane()).await.unwrap();

        let wrong_password = f
            .service
            .authenticate("jane@example.com", "wrong-horse")
            .await
            .unwrap_err();
        let unknown_email = f
            .service
            .authenticate("nobody@example.com", "correct-horse")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, DomainError::Unauthorized { .. }));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_update_password_rehashes() {
        let f = fixture();
        let user = f.service.create(jane()).await.unwrap();

        f.service
            .update(
                &user.id.to_string(),
                UpdateUserRequest {
                    password: Some("new-password-1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(f
            .service
            .authenticate("jane@example.com", "new-password-1")
            .await
            .is_ok());
        assert!(f
            .service
            .authenticate("jane@example.com", "correct-horse")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_update_profile_keeps_password() {
        let f = fixture();
        let user = f.service.create(jane()).await.unwrap();
        let id = user.id.to_string();
        f.service.get(&id).await.unwrap();

        let updated = f
            .service
            .update(
                &id,
                UpdateUserRequest {
                    last_name: Some("Doe".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Jane"));
        assert_eq!(updated.last_name.as_deref(), Some("Doe"));
        assert_eq!(f.service.get(&id).await.unwrap().last_name.as_deref(), Some("Doe"));
        assert!(f
            .service
            .authenticate("jane@example.com", "correct-horse")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let f = fixture();
        let user = f.service.create(jane()).await.unwrap();
        let id = user.id.to_string();

        f.service.delete(&id).await.unwrap();

        assert!(matches!(f.service.get(&id).await, Err(DomainError::NotFound { .. })));
        assert!(f
            .service
            .authenticate("jane@example.com", "correct-horse")
            .await
            .is_err());
    }
}
