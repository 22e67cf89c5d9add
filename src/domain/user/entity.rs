//! User entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    validate_email, validate_person_name, validate_username, UserValidationError,
};
use crate::domain::cache::ResourceKind;
use crate::domain::storage::Record;

/// Registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a user from stored columns
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        email: String,
        username: String,
        password_hash: String,
        first_name: Option<String>,
        last_name: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            username,
            password_hash,
            first_name,
            last_name,
            created_at,
            updated_at,
        }
    }

    pub fn with_names(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Update the password hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        validate_email(&self.email)?;
        validate_username(&self.username)?;
        validate_person_name("first_name", self.first_name.as_deref())?;
        validate_person_name("last_name", self.last_name.as_deref())
    }
}

impl Record for User {
    const KIND: ResourceKind = ResourceKind::User;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn redacted(&self) -> Self {
        Self {
            password_hash: String::new(),
            ..self.clone()
        }
    }

    fn conflicts_with(&self, other: &Self) -> Option<String> {
        if self.email.eq_ignore_ascii_case(&other.email) {
            Some(format!("Email '{}' is already registered", self.email))
        } else if self.username == other.username {
            Some(format!("Username '{}' already exists", self.username))
        } else {
            None
        }
    }
}
