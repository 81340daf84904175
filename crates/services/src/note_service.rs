use std::sync::Arc;

use chrono::NaiveDate;

use storage::repository::{NewNoteRecord, NoteRepository};
use track_core::model::{Note, NoteError, NoteId};

use crate::Clock;
use crate::error::NoteServiceError;

/// Free-text notes attached to calendar days.
#[derive(Clone)]
pub struct NoteService {
    clock: Clock,
    notes: Arc<dyn NoteRepository>,
}

impl NoteService {
    #[must_use]
    pub fn new(clock: Clock, notes: Arc<dyn NoteRepository>) -> Self {
        Self { clock, notes }
    }

    /// Add a note for a day.
    ///
    /// # Errors
    ///
    /// Returns `NoteServiceError::Note` for empty content and
    /// `NoteServiceError::Storage` if persistence fails.
    pub async fn add_note(
        &self,
        content: &str,
        date: NaiveDate,
    ) -> Result<NoteId, NoteServiceError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(NoteError::EmptyContent.into());
        }
        let id = self
            .notes
            .insert_note(NewNoteRecord {
                content: content.to_owned(),
                date,
                created_at: self.clock.now(),
            })
            .await?;
        Ok(id)
    }

    /// All notes, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `NoteServiceError::Storage` if repository access fails.
    pub async fn list_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        let notes = self.notes.list_notes().await?;
        Ok(notes)
    }

    /// Replace a note's content.
    ///
    /// # Errors
    ///
    /// Returns `NoteServiceError::Note` for empty content and
    /// `NoteServiceError::Storage` if the note does not exist.
    pub async fn edit_note(&self, id: NoteId, content: &str) -> Result<(), NoteServiceError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(NoteError::EmptyContent.into());
        }
        self.notes.update_content(id, content).await?;
        Ok(())
    }

    /// Delete a note.
    ///
    /// # Errors
    ///
    /// Returns `NoteServiceError::Storage` if the note does not exist.
    pub async fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.notes.delete_note(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use storage::repository::InMemoryRepository;
    use track_core::time::fixed_now;

    fn service() -> NoteService {
        NoteService::new(
            Clock::Fixed(fixed_now()),
            Arc::new(InMemoryRepository::new()),
        )
    }

    #[tokio::test]
    async fn add_and_edit_note() {
        let service = service();
        let id = service
            .add_note("  lower back tight  ", "2024-01-10".parse().unwrap())
            .await
            .unwrap();

        service.edit_note(id, "back fine after mobility").await.unwrap();

        let notes = service.list_notes().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content(), "back fine after mobility");
    }

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let service = service();
        let err = service
            .add_note("   ", "2024-01-10".parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, NoteServiceError::Note(_)));
    }

    #[tokio::test]
    async fn delete_missing_note_is_not_found() {
        let service = service();
        let err = service.delete_note(NoteId::new(7)).await.unwrap_err();
        assert!(matches!(err, NoteServiceError::Storage(_)));
    }
}
