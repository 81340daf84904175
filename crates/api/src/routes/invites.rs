use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use crate::{ApiError, AppState};

#[derive(Deserialize)]
pub struct GenerateBody {
    pub email: String,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let code = state.services.invites().generate(&body.email).await?;
    Ok(Json(json!({ "code": code })))
}

#[derive(Deserialize)]
pub struct RedeemBody {
    pub code: String,
    pub email: String,
}

pub async fn redeem(
    State(state): State<AppState>,
    Json(body): Json<RedeemBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .services
        .invites()
        .redeem(&body.code, &body.email)
        .await?;
    Ok(Json(json!({ "status": "redeemed" })))
}
