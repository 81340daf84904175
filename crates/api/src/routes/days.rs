use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use services::{DayPlan, MoveDirection};

use crate::{ApiError, AppState};

pub async fn day_plan(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<DayPlan>, ApiError> {
    let plan = state.services.workouts().day_plan(date).await?;
    Ok(Json(plan))
}

pub async fn clear_day(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = state.services.workouts().clear_day(date).await?;
    Ok(Json(json!({ "removed": removed })))
}

#[derive(Deserialize)]
pub struct CloneBody {
    pub target: NaiveDate,
}

pub async fn clone_day(
    State(state): State<AppState>,
    Path(source): Path<NaiveDate>,
    Json(body): Json<CloneBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let inserted = state
        .services
        .workouts()
        .clone_day(source, body.target)
        .await?;
    Ok(Json(json!({ "inserted": inserted })))
}

#[derive(Deserialize)]
pub struct ReorderBody {
    pub exercise: String,
    pub direction: MoveDirection,
}

pub async fn reorder(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Json(body): Json<ReorderBody>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .workouts()
        .move_exercise(date, &body.exercise, body.direction)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct RepeatBody {
    pub exercise: String,
}

pub async fn repeat_last_set(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Json(body): Json<RepeatBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = state
        .services
        .workouts()
        .repeat_last_set(date, &body.exercise)
        .await?;
    Ok(Json(json!({ "id": id })))
}

pub async fn workout_dates(
    State(state): State<AppState>,
) -> Result<Json<Vec<NaiveDate>>, ApiError> {
    let dates = state.services.workouts().workout_dates().await?;
    Ok(Json(dates))
}
