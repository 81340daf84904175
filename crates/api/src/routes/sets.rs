use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::json;

use services::NewSetInput;
use track_core::model::SetId;

use crate::{ApiError, AppState};

pub async fn log_sets(
    State(state): State<AppState>,
    Json(input): Json<NewSetInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let ids = state.services.workouts().log_sets(input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "ids": ids }))))
}

#[derive(Deserialize)]
pub struct UpdateSetBody {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub completed: Option<bool>,
}

pub async fn update_set(
    State(state): State<AppState>,
    Path(id): Path<SetId>,
    Json(body): Json<UpdateSetBody>,
) -> Result<StatusCode, ApiError> {
    let workouts = state.services.workouts();

    match (body.weight, body.reps) {
        (Some(weight), Some(reps)) => workouts.update_metrics(id, weight, reps).await?,
        (None, None) => {}
        _ => {
            return Err(ApiError::unprocessable(
                "weight and reps must be updated together",
            ));
        }
    }
    if let Some(completed) = body.completed {
        workouts.set_completed(id, completed).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_set(
    State(state): State<AppState>,
    Path(id): Path<SetId>,
) -> Result<StatusCode, ApiError> {
    state.services.workouts().delete_set(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
