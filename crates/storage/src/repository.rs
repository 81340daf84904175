use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use track_core::model::{Category, Invite, InviteId, Note, NoteId, SetEntry, SetId};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a set entry, before an identifier is assigned.
#[derive(Debug, Clone)]
pub struct NewSetRecord {
    pub exercise: String,
    pub category: Category,
    pub weight: f64,
    pub reps: u32,
    pub date: NaiveDate,
    pub completed: bool,
    pub sort_order: u32,
    pub created_at: DateTime<Utc>,
}

impl NewSetRecord {
    /// Build an insert record that clones an existing entry onto a target
    /// date with the completion flag reset.
    #[must_use]
    pub fn clone_of(set: &SetEntry, date: NaiveDate, created_at: DateTime<Utc>) -> Self {
        Self {
            exercise: set.exercise().to_owned(),
            category: set.category(),
            weight: set.weight(),
            reps: set.reps(),
            date,
            completed: false,
            sort_order: set.sort_order(),
            created_at,
        }
    }
}

/// Insert shape for a note.
#[derive(Debug, Clone)]
pub struct NewNoteRecord {
    pub content: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Repository contract for logged sets.
#[async_trait]
pub trait SetRepository: Send + Sync {
    /// Insert one or more set records, returning the assigned IDs in order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any record cannot be stored.
    async fn insert_sets(&self, records: &[NewSetRecord]) -> Result<Vec<SetId>, StorageError>;

    /// Fetch every stored set, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_all(&self) -> Result<Vec<SetEntry>, StorageError>;

    /// Fetch the sets of one day, ordered by sort order then creation time.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_for_day(&self, date: NaiveDate) -> Result<Vec<SetEntry>, StorageError>;

    /// Update the weight/reps of one set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the set does not exist.
    async fn update_metrics(&self, id: SetId, weight: f64, reps: u32) -> Result<(), StorageError>;

    /// Set the completion flag of one set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the set does not exist.
    async fn set_completed(&self, id: SetId, completed: bool) -> Result<(), StorageError>;

    /// Apply a batch of sort-order changes atomically; either every change
    /// is applied or none is.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if any referenced set is missing.
    async fn update_sort_orders(&self, changes: &[(SetId, u32)]) -> Result<(), StorageError>;

    /// Delete one set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the set does not exist.
    async fn delete_set(&self, id: SetId) -> Result<(), StorageError>;

    /// Delete every set of one day, returning the number removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn delete_for_day(&self, date: NaiveDate) -> Result<u64, StorageError>;

    /// Distinct dates with at least one logged set, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn workout_dates(&self) -> Result<Vec<NaiveDate>, StorageError>;
}

/// Repository contract for notes.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a note, returning the assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the note cannot be stored.
    async fn insert_note(&self, record: NewNoteRecord) -> Result<NoteId, StorageError>;

    /// Fetch all notes, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_notes(&self) -> Result<Vec<Note>, StorageError>;

    /// Replace a note's content.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the note does not exist.
    async fn update_content(&self, id: NoteId, content: &str) -> Result<(), StorageError>;

    /// Delete a note.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the note does not exist.
    async fn delete_note(&self, id: NoteId) -> Result<(), StorageError>;
}

/// Repository contract for signup invites.
#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Store a freshly generated code, returning the assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the code already exists.
    async fn insert_invite(
        &self,
        code: &str,
        created_at: DateTime<Utc>,
    ) -> Result<InviteId, StorageError>;

    /// Look up an invite by its code.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn find_by_code(&self, code: &str) -> Result<Option<Invite>, StorageError>;

    /// Mark an invite as redeemed by the given email.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the invite does not exist.
    async fn mark_used(&self, id: InviteId, email: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Mutex<InMemoryState>>,
}

#[derive(Default)]
struct InMemoryState {
    sets: Vec<SetEntry>,
    notes: Vec<Note>,
    invites: Vec<Invite>,
    next_set_id: u64,
    next_note_id: u64,
    next_invite_id: u64,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait]
impl SetRepository for InMemoryRepository {
    async fn insert_sets(&self, records: &[NewSetRecord]) -> Result<Vec<SetId>, StorageError> {
        let mut state = self.lock()?;
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            state.next_set_id += 1;
            let id = SetId::new(state.next_set_id);
            let entry = SetEntry::from_persisted(
                id,
                record.exercise.clone(),
                record.category,
                record.weight,
                record.reps,
                record.date,
                record.completed,
                record.sort_order,
                record.created_at,
            )
            .map_err(ser)?;
            state.sets.push(entry);
            ids.push(id);
        }
        Ok(ids)
    }

    async fn list_all(&self) -> Result<Vec<SetEntry>, StorageError> {
        let state = self.lock()?;
        let mut sets = state.sets.clone();
        sets.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().value().cmp(&a.id().value()))
        });
        Ok(sets)
    }

    async fn list_for_day(&self, date: NaiveDate) -> Result<Vec<SetEntry>, StorageError> {
        let state = self.lock()?;
        let mut sets: Vec<SetEntry> = state
            .sets
            .iter()
            .filter(|s| s.date() == date)
            .cloned()
            .collect();
        sets.sort_by(|a, b| {
            a.sort_order()
                .cmp(&b.sort_order())
                .then_with(|| a.created_at().cmp(&b.created_at()))
                .then_with(|| a.id().value().cmp(&b.id().value()))
        });
        Ok(sets)
    }

    async fn update_metrics(&self, id: SetId, weight: f64, reps: u32) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let set = state
            .sets
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or(StorageError::NotFound)?;
        set.update_metrics(weight, reps).map_err(ser)
    }

    async fn set_completed(&self, id: SetId, completed: bool) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let set = state
            .sets
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or(StorageError::NotFound)?;
        set.set_completed(completed);
        Ok(())
    }

    async fn update_sort_orders(&self, changes: &[(SetId, u32)]) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        // Validate first so a missing row leaves the batch untouched.
        for (id, _) in changes {
            if !state.sets.iter().any(|s| s.id() == *id) {
                return Err(StorageError::NotFound);
            }
        }
        for (id, order) in changes {
            if let Some(index) = state.sets.iter().position(|s| s.id() == *id) {
                let set = &state.sets[index];
                let updated = SetEntry::from_persisted(
                    set.id(),
                    set.exercise().to_owned(),
                    set.category(),
                    set.weight(),
                    set.reps(),
                    set.date(),
                    set.is_completed(),
                    *order,
                    set.created_at(),
                )
                .map_err(ser)?;
                state.sets[index] = updated;
            }
        }
        Ok(())
    }

    async fn delete_set(&self, id: SetId) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let before = state.sets.len();
        state.sets.retain(|s| s.id() != id);
        if state.sets.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_for_day(&self, date: NaiveDate) -> Result<u64, StorageError> {
        let mut state = self.lock()?;
        let before = state.sets.len();
        state.sets.retain(|s| s.date() != date);
        Ok((before - state.sets.len()) as u64)
    }

    async fn workout_dates(&self) -> Result<Vec<NaiveDate>, StorageError> {
        let state = self.lock()?;
        let mut dates: Vec<NaiveDate> = state.sets.iter().map(SetEntry::date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates.reverse();
        Ok(dates)
    }
}

#[async_trait]
impl NoteRepository for InMemoryRepository {
    async fn insert_note(&self, record: NewNoteRecord) -> Result<NoteId, StorageError> {
        let mut state = self.lock()?;
        state.next_note_id += 1;
        let id = NoteId::new(state.next_note_id);
        let note = Note::new(id, record.content, record.date, record.created_at).map_err(ser)?;
        state.notes.push(note);
        Ok(id)
    }

    async fn list_notes(&self) -> Result<Vec<Note>, StorageError> {
        let state = self.lock()?;
        let mut notes = state.notes.clone();
        notes.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().value().cmp(&a.id().value()))
        });
        Ok(notes)
    }

    async fn update_content(&self, id: NoteId, content: &str) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let note = state
            .notes
            .iter_mut()
            .find(|n| n.id() == id)
            .ok_or(StorageError::NotFound)?;
        note.set_content(content).map_err(ser)
    }

    async fn delete_note(&self, id: NoteId) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let before = state.notes.len();
        state.notes.retain(|n| n.id() != id);
        if state.notes.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl InviteRepository for InMemoryRepository {
    async fn insert_invite(
        &self,
        code: &str,
        created_at: DateTime<Utc>,
    ) -> Result<InviteId, StorageError> {
        let mut state = self.lock()?;
        if state.invites.iter().any(|i| i.code() == code) {
            return Err(StorageError::Conflict);
        }
        state.next_invite_id += 1;
        let id = InviteId::new(state.next_invite_id);
        let invite = Invite::from_persisted(id, code, false, None, created_at).map_err(ser)?;
        state.invites.push(invite);
        Ok(id)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Invite>, StorageError> {
        let state = self.lock()?;
        Ok(state.invites.iter().find(|i| i.code() == code).cloned())
    }

    async fn mark_used(&self, id: InviteId, email: &str) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let invite = state
            .invites
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or(StorageError::NotFound)?;
        let updated = Invite::from_persisted(
            invite.id(),
            invite.code().to_owned(),
            true,
            Some(email.to_owned()),
            invite.created_at(),
        )
        .map_err(ser)?;
        *invite = updated;
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sets: Arc<dyn SetRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub invites: Arc<dyn InviteRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let sets: Arc<dyn SetRepository> = Arc::new(repo.clone());
        let notes: Arc<dyn NoteRepository> = Arc::new(repo.clone());
        let invites: Arc<dyn InviteRepository> = Arc::new(repo);
        Self {
            sets,
            notes,
            invites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use track_core::time::fixed_now;

    fn record(exercise: &str, day: &str, offset_secs: i64) -> NewSetRecord {
        NewSetRecord {
            exercise: exercise.to_owned(),
            category: Category::Strength,
            weight: 100.0,
            reps: 5,
            date: day.parse().unwrap(),
            completed: false,
            sort_order: 0,
            created_at: fixed_now() + Duration::seconds(offset_secs),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let repo = InMemoryRepository::new();
        let ids = repo
            .insert_sets(&[
                record("SQUAT", "2024-01-10", 0),
                record("SQUAT", "2024-01-10", 1),
            ])
            .await
            .unwrap();
        assert_eq!(ids, vec![SetId::new(1), SetId::new(2)]);
    }

    #[tokio::test]
    async fn list_all_orders_newest_first() {
        let repo = InMemoryRepository::new();
        repo.insert_sets(&[
            record("SQUAT", "2024-01-10", 0),
            record("BENCH PRESS", "2024-01-11", 10),
        ])
        .await
        .unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all[0].exercise(), "BENCH PRESS");
        assert_eq!(all[1].exercise(), "SQUAT");
    }

    #[tokio::test]
    async fn delete_for_day_only_touches_that_date() {
        let repo = InMemoryRepository::new();
        repo.insert_sets(&[
            record("SQUAT", "2024-01-10", 0),
            record("SQUAT", "2024-01-10", 1),
            record("SQUAT", "2024-01-11", 2),
        ])
        .await
        .unwrap();

        let removed = repo.delete_for_day("2024-01-10".parse().unwrap()).await.unwrap();
        assert_eq!(removed, 2);

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].date(), "2024-01-11".parse::<NaiveDate>().unwrap());
    }

    #[tokio::test]
    async fn update_sort_orders_rejects_missing_rows_without_partial_apply() {
        let repo = InMemoryRepository::new();
        let ids = repo
            .insert_sets(&[record("SQUAT", "2024-01-10", 0)])
            .await
            .unwrap();

        let err = repo
            .update_sort_orders(&[(ids[0], 5), (SetId::new(999), 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));

        let day = repo.list_for_day("2024-01-10".parse().unwrap()).await.unwrap();
        assert_eq!(day[0].sort_order(), 0);
    }

    #[tokio::test]
    async fn invites_roundtrip_and_conflict() {
        let repo = InMemoryRepository::new();
        let id = repo.insert_invite("AB12CD34", fixed_now()).await.unwrap();

        let err = repo.insert_invite("AB12CD34", fixed_now()).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));

        repo.mark_used(id, "someone@example.com").await.unwrap();
        let invite = repo.find_by_code("AB12CD34").await.unwrap().unwrap();
        assert!(invite.is_used());
        assert_eq!(invite.used_by_email(), Some("someone@example.com"));
    }

    #[tokio::test]
    async fn notes_order_newest_first() {
        let repo = InMemoryRepository::new();
        repo.insert_note(NewNoteRecord {
            content: "first".into(),
            date: "2024-01-10".parse().unwrap(),
            created_at: fixed_now(),
        })
        .await
        .unwrap();
        repo.insert_note(NewNoteRecord {
            content: "second".into(),
            date: "2024-01-10".parse().unwrap(),
            created_at: fixed_now() + Duration::seconds(1),
        })
        .await
        .unwrap();

        let notes = repo.list_notes().await.unwrap();
        assert_eq!(notes[0].content(), "second");
        assert_eq!(notes[1].content(), "first");
    }
}
