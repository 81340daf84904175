use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use track_core::model::SetEntry;
use track_core::stats::{ExerciseSummary, SessionComparison, Window};

use crate::{ApiError, AppState};

#[derive(Deserialize)]
pub struct SummaryParams {
    pub window: Option<String>,
    pub reference: Option<NaiveDate>,
}

pub async fn summary(
    State(state): State<AppState>,
    Path(exercise): Path<String>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<ExerciseSummary>, ApiError> {
    let window = match params.window.as_deref() {
        Some(raw) => raw
            .parse::<Window>()
            .map_err(|e| ApiError::unprocessable(e.to_string()))?,
        None => Window::Session,
    };
    let reference = params.reference.unwrap_or_else(|| state.clock.today());

    let summary = state
        .services
        .progress()
        .exercise_summary(&exercise, window, reference)
        .await?;
    Ok(Json(summary))
}

pub async fn comparison(
    State(state): State<AppState>,
    Path(exercise): Path<String>,
) -> Result<Json<Option<SessionComparison>>, ApiError> {
    let comparison = state
        .services
        .progress()
        .session_comparison(&exercise)
        .await?;
    Ok(Json(comparison))
}

pub async fn max_reps(
    State(state): State<AppState>,
    Path(exercise): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let max = state.services.progress().overall_max_reps(&exercise).await?;
    Ok(Json(json!({ "max_reps": max })))
}

pub async fn exercise_names(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = state.services.progress().exercise_names().await?;
    Ok(Json(names))
}

#[derive(Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
}

pub async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let hits = state.services.progress().suggestions(&params.q).await?;
    Ok(Json(hits))
}

pub async fn last_entry(
    State(state): State<AppState>,
    Path(exercise): Path<String>,
) -> Result<Json<Option<SetEntry>>, ApiError> {
    let last = state.services.progress().last_entry(&exercise).await?;
    Ok(Json(last))
}
