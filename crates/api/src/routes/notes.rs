use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use track_core::model::{Note, NoteId};

use crate::{ApiError, AppState};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.services.notes().list_notes().await?;
    Ok(Json(notes))
}

#[derive(Deserialize)]
pub struct AddNoteBody {
    pub content: String,
    pub date: NaiveDate,
}

pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddNoteBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id = state
        .services
        .notes()
        .add_note(&body.content, body.date)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

#[derive(Deserialize)]
pub struct EditNoteBody {
    pub content: String,
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
    Json(body): Json<EditNoteBody>,
) -> Result<StatusCode, ApiError> {
    state.services.notes().edit_note(id, &body.content).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
) -> Result<StatusCode, ApiError> {
    state.services.notes().delete_note(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
