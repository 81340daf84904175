use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::NoteId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NoteError {
    #[error("note content cannot be empty")]
    EmptyContent,
}

/// A free-text note attached to a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    id: NoteId,
    content: String,
    date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl Note {
    /// Creates a note with trimmed content.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::EmptyContent` if the content is empty or
    /// whitespace-only.
    pub fn new(
        id: NoteId,
        content: impl Into<String>,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Self, NoteError> {
        let content = content.into().trim().to_owned();
        if content.is_empty() {
            return Err(NoteError::EmptyContent);
        }

        Ok(Self {
            id,
            content,
            date,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> NoteId {
        self.id
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the note content.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::EmptyContent` if the new content is empty.
    pub fn set_content(&mut self, content: impl Into<String>) -> Result<(), NoteError> {
        let content = content.into().trim().to_owned();
        if content.is_empty() {
            return Err(NoteError::EmptyContent);
        }
        self.content = content;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn note_trims_content() {
        let note = Note::new(
            NoteId::new(1),
            "  felt strong today  ",
            "2024-01-10".parse().unwrap(),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(note.content(), "felt strong today");
    }

    #[test]
    fn note_rejects_empty_content() {
        let err = Note::new(
            NoteId::new(1),
            "   ",
            "2024-01-10".parse().unwrap(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, NoteError::EmptyContent);
    }

    #[test]
    fn set_content_rejects_empty() {
        let mut note = Note::new(
            NoteId::new(1),
            "x",
            "2024-01-10".parse().unwrap(),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(note.set_content("  ").unwrap_err(), NoteError::EmptyContent);
        assert_eq!(note.content(), "x");
    }
}
