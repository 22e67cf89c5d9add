//! Record trait shared by every persisted resource

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::domain::cache::ResourceKind;

/// A persisted resource that may be cached
pub trait Record: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Resource kind, which fixes the cache key prefix
    const KIND: ResourceKind;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    /// Copy of the record that is safe to place in the cache
    fn redacted(&self) -> Self {
        self.clone()
    }

    /// Describes a uniqueness violation between two records, if any
    ///
    /// Only consulted by stores without their own constraints.
    fn conflicts_with(&self, _other: &Self) -> Option<String> {
        None
    }
}

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use serde::Deserialize;

    /// Minimal record used by store and cache tests
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Note {
        pub id: Uuid,
        pub title: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub secret: String,
        pub created_at: DateTime<Utc>,
    }

    impl Note {
        pub fn new(title: &str) -> Self {
            Self {
                id: Uuid::new_v4(),
                title: title.to_string(),
                secret: String::new(),
                created_at: Utc::now(),
            }
        }

        pub fn with_secret(mut self, secret: &str) -> Self {
            self.secret = secret.to_string();
            self
        }
    }

    impl Record for Note {
        const KIND: ResourceKind = ResourceKind::Exercise;

        fn id(&self) -> Uuid {
            self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn redacted(&self) -> Self {
            Self {
                secret: String::new(),
                ..self.clone()
            }
        }

        fn conflicts_with(&self, other: &Self) -> Option<String> {
            (self.title == other.title).then(|| format!("Title '{}' already taken", self.title))
        }
    }
}
