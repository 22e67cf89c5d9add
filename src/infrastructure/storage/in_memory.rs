//! In-memory record store implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::pagination::Page;
use crate::domain::storage::{Record, RecordStore};
use crate::domain::user::{User, UserStore};
use crate::domain::DomainError;

/// Thread-safe in-memory record store
///
/// Useful for testing and development. Data is lost when the process terminates.
/// Uniqueness rules come from [`Record::conflicts_with`]; foreign keys and
/// cascades are not modelled.
#[derive(Debug)]
pub struct InMemoryRecordStore<E>
where
    E: Record,
{
    records: RwLock<HashMap<Uuid, E>>,
}

impl<E> Default for InMemoryRecordStore<E>
where
    E: Record,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryRecordStore<E>
where
    E: Record,
{
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store pre-populated with records
    pub fn with_records(records: Vec<E>) -> Self {
        let map = records.into_iter().map(|r| (r.id(), r)).collect();
        Self {
            records: RwLock::new(map),
        }
    }

    fn read_lock(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<Uuid, E>>, DomainError> {
        self.records.read().map_err(|e| {
            DomainError::store_unavailable(format!("Failed to acquire read lock: {}", e))
        })
    }

    fn write_lock(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, E>>, DomainError> {
        self.records.write().map_err(|e| {
            DomainError::store_unavailable(format!("Failed to acquire write lock: {}", e))
        })
    }

    fn check_conflicts(records: &HashMap<Uuid, E>, candidate: &E) -> Result<(), DomainError> {
        let conflict = records
            .values()
            .filter(|existing| existing.id() != candidate.id())
            .find_map(|existing| candidate.conflicts_with(existing));

        match conflict {
            Some(message) => Err(DomainError::conflict(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<E> RecordStore<E> for InMemoryRecordStore<E>
where
    E: Record,
{
    async fn create(&self, record: E) -> Result<E, DomainError> {
        let mut records = self.write_lock()?;

        if records.contains_key(&record.id()) {
            return Err(DomainError::conflict(format!(
                "{} '{}' already exists",
                E::KIND.display_name(),
                record.id()
            )));
        }

        Self::check_conflicts(&records, &record)?;
        records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<E>, DomainError> {
        Ok(self.read_lock()?.get(id).cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<E>, DomainError> {
        let records = self.read_lock()?;
        let mut all: Vec<E> = records.values().cloned().collect();

        // Newest first, id as tiebreaker for a stable window
        all.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });

        Ok(all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn update(&self, record: E) -> Result<E, DomainError> {
        let mut records = self.write_lock()?;

        if !records.contains_key(&record.id()) {
            return Err(DomainError::not_found(format!(
                "{} '{}' not found",
                E::KIND.display_name(),
                record.id()
            )));
        }

        Self::check_conflicts(&records, &record)?;
        records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        Ok(self.write_lock()?.remove(id).is_some())
    }
}

#[async_trait]
impl UserStore for InMemoryRecordStore<User> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .read_lock()?
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::fixtures::Note;
    use crate::domain::WorkoutExercise;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryRecordStore::new();
        let note = Note::new("first");

        let created = store.create(note.clone()).await.unwrap();
        assert_eq!(created, note);

        let fetched = store.get(&note.id).await.unwrap();
        assert_eq!(fetched, Some(note));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store: InMemoryRecordStore<Note> = InMemoryRecordStore::new();
        assert!(store.get(&Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_id() {
        let store = InMemoryRecordStore::new();
        let note = Note::new("first");

        store.create(note.clone()).await.unwrap();
        let result = store.create(note).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_create_enforces_uniqueness_rule() {
        let store = InMemoryRecordStore::new();

        store.create(Note::new("same")).await.unwrap();
        let result = store.create(Note::new("same")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_enforces_uniqueness_against_others_only() {
        let store = InMemoryRecordStore::new();
        let a = store.create(Note::new("a")).await.unwrap();
        store.create(Note::new("b")).await.unwrap();

        // Saving a record under its own unique value is fine
        assert!(store.update(a.clone()).await.is_ok());

        let mut renamed = a.clone();
        renamed.title = "b".to_string();
        let result = store.update(renamed).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_missing() {
        let store = InMemoryRecordStore::new();
        let result = store.update(Note::new("ghost")).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryRecordStore::new();
        let note = store.create(Note::new("doomed")).await.unwrap();

        assert!(store.delete(&note.id).await.unwrap());
        assert!(!store.delete(&note.id).await.unwrap());
        assert!(store.get(&note.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_window() {
        let base = chrono::Utc::now();
        let notes: Vec<Note> = (0..5)
            .map(|i| {
                let mut n = Note::new(&format!("note-{}", i));
                n.created_at = base + chrono::Duration::seconds(i);
                n
            })
            .collect();
        let store = InMemoryRecordStore::with_records(notes);

        let first = store.list(Page::new(Some(2), None)).await.unwrap();
        let titles: Vec<_> = first.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["note-4", "note-3"]);

        let last = store.list(Page::new(Some(2), Some(4))).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].title, "note-0");

        let beyond = store.list(Page::new(Some(10), Some(50))).await.unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_email_case_insensitive() {
        let store = InMemoryRecordStore::new();
        let user = User::new("Jane@Example.com", "jane", "hash");
        store.create(user.clone()).await.unwrap();

        let found = store.find_by_email("jane@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_email_differing_only_in_case_conflicts() {
        let store = InMemoryRecordStore::new();
        store
            .create(User::new("Jane@Example.com", "jane", "hash"))
            .await
            .unwrap();

        let duplicate = store
            .create(User::new("jane@example.com", "jane_two", "hash"))
            .await;
        assert!(matches!(duplicate, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_found_user_keeps_password_hash() {
        let store = InMemoryRecordStore::new();
        store
            .create(User::new("jane@example.com", "jane", "$argon2id$hash"))
            .await
            .unwrap();

        let found = store.find_by_email("jane@example.com").await.unwrap().unwrap();
        assert_eq!(found.password_hash(), "$argon2id$hash");
    }

    #[tokio::test]
    async fn test_workout_exercise_slot_unique() {
        let store = InMemoryRecordStore::new();
        let (workout, exercise) = (Uuid::new_v4(), Uuid::new_v4());

        store
            .create(WorkoutExercise::new(workout, exercise, 3, 0))
            .await
            .unwrap();
        let duplicate = store.create(WorkoutExercise::new(workout, exercise, 4, 0)).await;
        let next_slot = store.create(WorkoutExercise::new(workout, exercise, 4, 1)).await;

        assert!(matches!(duplicate, Err(DomainError::Conflict { .. })));
        assert!(next_slot.is_ok());
    }
}
