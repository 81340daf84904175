//! Router assembly for the HTTP surface.

mod days;
mod invites;
mod notes;
mod sets;
mod stats;

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/generate-invite", post(invites::generate))
        .route("/redeem-invite", post(invites::redeem))
        .route("/api/days/:date", get(days::day_plan).delete(days::clear_day))
        .route("/api/days/:date/clone", post(days::clone_day))
        .route("/api/days/:date/reorder", post(days::reorder))
        .route("/api/days/:date/repeat", post(days::repeat_last_set))
        .route("/api/dates", get(days::workout_dates))
        .route("/api/sets", post(sets::log_sets))
        .route("/api/sets/:id", patch(sets::update_set).delete(sets::delete_set))
        .route("/api/stats/:exercise", get(stats::summary))
        .route("/api/stats/:exercise/comparison", get(stats::comparison))
        .route("/api/stats/:exercise/max-reps", get(stats::max_reps))
        .route("/api/exercises", get(stats::exercise_names))
        .route("/api/exercises/suggest", get(stats::suggestions))
        .route("/api/exercises/:exercise/last", get(stats::last_entry))
        .route("/api/notes", get(notes::list).post(notes::add))
        .route("/api/notes/:id", patch(notes::edit).delete(notes::remove))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
