//! Error-to-response mapping for the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use services::{InviteError, NoteServiceError, ProgressServiceError, WorkoutServiceError};
use storage::repository::StorageError;

/// One error type for every handler: a status code plus a message that is
/// safe to show to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to process request",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn from_storage(e: &StorageError) -> ApiError {
    match e {
        StorageError::NotFound => ApiError::new(StatusCode::NOT_FOUND, "not found"),
        StorageError::Conflict => ApiError::new(StatusCode::CONFLICT, "conflict"),
        _ => {
            error!(error = %e, "storage failure");
            ApiError::internal()
        }
    }
}

impl From<WorkoutServiceError> for ApiError {
    fn from(e: WorkoutServiceError) -> Self {
        match e {
            WorkoutServiceError::NoHistory => {
                ApiError::new(StatusCode::NOT_FOUND, e.to_string())
            }
            WorkoutServiceError::Set(set) => ApiError::unprocessable(set.to_string()),
            WorkoutServiceError::Storage(ref storage) => from_storage(storage),
            _ => {
                error!(error = %e, "unexpected workout service failure");
                ApiError::internal()
            }
        }
    }
}

impl From<ProgressServiceError> for ApiError {
    fn from(e: ProgressServiceError) -> Self {
        match e {
            ProgressServiceError::Set(set) => ApiError::unprocessable(set.to_string()),
            ProgressServiceError::Storage(ref storage) => from_storage(storage),
            _ => {
                error!(error = %e, "unexpected progress service failure");
                ApiError::internal()
            }
        }
    }
}

impl From<NoteServiceError> for ApiError {
    fn from(e: NoteServiceError) -> Self {
        match e {
            NoteServiceError::Note(note) => ApiError::unprocessable(note.to_string()),
            NoteServiceError::Storage(ref storage) => from_storage(storage),
            _ => {
                error!(error = %e, "unexpected note service failure");
                ApiError::internal()
            }
        }
    }
}

impl From<InviteError> for ApiError {
    fn from(e: InviteError) -> Self {
        match e {
            InviteError::NotAuthorized => {
                ApiError::new(StatusCode::FORBIDDEN, "Not authorized")
            }
            InviteError::UnknownCode => {
                ApiError::new(StatusCode::NOT_FOUND, e.to_string())
            }
            InviteError::AlreadyUsed => ApiError::new(StatusCode::CONFLICT, e.to_string()),
            InviteError::Code(code) => ApiError::unprocessable(code.to_string()),
            InviteError::Storage(e) => {
                error!(error = %e, "invite storage failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate invite",
                )
            }
            _ => {
                error!(error = %e, "unexpected invite failure");
                ApiError::internal()
            }
        }
    }
}
