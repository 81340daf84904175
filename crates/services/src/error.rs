//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use track_core::model::{InviteCodeError, NoteError, SetError};

/// Errors emitted by `WorkoutService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkoutServiceError {
    #[error("no sets logged for this exercise yet")]
    NoHistory,
    #[error(transparent)]
    Set(#[from] SetError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Set(#[from] SetError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `NoteService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NoteServiceError {
    #[error(transparent)]
    Note(#[from] NoteError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `InviteService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InviteError {
    #[error("email is not authorized to generate invites")]
    NotAuthorized,
    #[error("invalid invite code")]
    UnknownCode,
    #[error("invite code has already been used")]
    AlreadyUsed,
    #[error(transparent)]
    Code(#[from] InviteCodeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
