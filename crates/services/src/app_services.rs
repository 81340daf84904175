use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::invite_service::InviteService;
use crate::note_service::NoteService;
use crate::progress_service::ProgressService;
use crate::workout_service::WorkoutService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    workouts: Arc<WorkoutService>,
    progress: Arc<ProgressService>,
    notes: Arc<NoteService>,
    invites: Arc<InviteService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        invite_email: String,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, invite_email))
    }

    /// Build services over an in-memory backend, for tests and prototyping.
    #[must_use]
    pub fn new_in_memory(clock: Clock, invite_email: String) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, invite_email)
    }

    fn from_storage(storage: &Storage, clock: Clock, invite_email: String) -> Self {
        let workouts = Arc::new(WorkoutService::new(clock, Arc::clone(&storage.sets)));
        let progress = Arc::new(ProgressService::new(clock, Arc::clone(&storage.sets)));
        let notes = Arc::new(NoteService::new(clock, Arc::clone(&storage.notes)));
        let invites = Arc::new(InviteService::new(
            clock,
            invite_email,
            Arc::clone(&storage.invites),
        ));
        Self {
            workouts,
            progress,
            notes,
            invites,
        }
    }

    #[must_use]
    pub fn workouts(&self) -> Arc<WorkoutService> {
        Arc::clone(&self.workouts)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn notes(&self) -> Arc<NoteService> {
        Arc::clone(&self.notes)
    }

    #[must_use]
    pub fn invites(&self) -> Arc<InviteService> {
        Arc::clone(&self.invites)
    }
}
