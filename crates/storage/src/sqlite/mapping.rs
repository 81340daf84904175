use sqlx::Row;
use track_core::model::{Category, Invite, InviteId, Note, NoteId, SetEntry, SetId};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn set_id_from_i64(v: i64) -> Result<SetId, StorageError> {
    Ok(SetId::new(i64_to_u64("set_id", v)?))
}

pub(crate) fn note_id_from_i64(v: i64) -> Result<NoteId, StorageError> {
    Ok(NoteId::new(i64_to_u64("note_id", v)?))
}

pub(crate) fn invite_id_from_i64(v: i64) -> Result<InviteId, StorageError> {
    Ok(InviteId::new(i64_to_u64("invite_id", v)?))
}

pub(crate) fn set_id_to_i64(id: SetId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("set_id overflow".into()))
}

pub(crate) fn note_id_to_i64(id: NoteId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("note_id overflow".into()))
}

pub(crate) fn invite_id_to_i64(id: InviteId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("invite_id overflow".into()))
}

pub(crate) fn map_set_row(row: &sqlx::sqlite::SqliteRow) -> Result<SetEntry, StorageError> {
    let category_str: String = row.try_get("category").map_err(ser)?;
    let category: Category = category_str.parse().map_err(ser)?;

    let reps_i64: i64 = row.try_get("reps").map_err(ser)?;
    let reps: u32 = u32::try_from(reps_i64)
        .map_err(|_| StorageError::Serialization(format!("invalid reps: {reps_i64}")))?;

    let sort_order_i64: i64 = row.try_get("sort_order").map_err(ser)?;
    let sort_order: u32 = u32::try_from(sort_order_i64).map_err(|_| {
        StorageError::Serialization(format!("invalid sort_order: {sort_order_i64}"))
    })?;

    SetEntry::from_persisted(
        set_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("exercise_name").map_err(ser)?,
        category,
        row.try_get("weight").map_err(ser)?,
        reps,
        row.try_get("set_date").map_err(ser)?,
        row.try_get("is_completed").map_err(ser)?,
        sort_order,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_note_row(row: &sqlx::sqlite::SqliteRow) -> Result<Note, StorageError> {
    Note::new(
        note_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("content").map_err(ser)?,
        row.try_get("note_date").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_invite_row(row: &sqlx::sqlite::SqliteRow) -> Result<Invite, StorageError> {
    Invite::from_persisted(
        invite_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("code").map_err(ser)?,
        row.try_get("is_used").map_err(ser)?,
        row.try_get("used_by_email").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}
