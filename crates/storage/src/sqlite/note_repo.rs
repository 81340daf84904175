use track_core::model::{Note, NoteId};

use super::{
    SqliteRepository,
    mapping::{map_note_row, note_id_to_i64},
};
use crate::repository::{NewNoteRecord, NoteRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl NoteRepository for SqliteRepository {
    async fn insert_note(&self, record: NewNoteRecord) -> Result<NoteId, StorageError> {
        let result = sqlx::query(
            r"
            INSERT INTO workout_notes (content, note_date, created_at)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(record.content.as_str())
        .bind(record.date)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        let rowid = result.last_insert_rowid();
        Ok(NoteId::new(u64::try_from(rowid).map_err(|_| {
            StorageError::Serialization("note_id sign overflow".into())
        })?))
    }

    async fn list_notes(&self) -> Result<Vec<Note>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, content, note_date, created_at
            FROM workout_notes
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut notes = Vec::with_capacity(rows.len());
        for row in rows {
            notes.push(map_note_row(&row)?);
        }
        Ok(notes)
    }

    async fn update_content(&self, id: NoteId, content: &str) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE workout_notes SET content = ?2 WHERE id = ?1")
            .bind(note_id_to_i64(id)?)
            .bind(content)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_note(&self, id: NoteId) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM workout_notes WHERE id = ?1")
            .bind(note_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
