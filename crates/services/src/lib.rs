#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod invite_service;
pub mod note_service;
pub mod progress_service;
pub mod workout_service;

pub use track_core::Clock;

pub use app_services::AppServices;
pub use error::{
    AppServicesError, InviteError, NoteServiceError, ProgressServiceError, WorkoutServiceError,
};
pub use invite_service::InviteService;
pub use note_service::NoteService;
pub use progress_service::ProgressService;
pub use workout_service::{DayPlan, MoveDirection, NewSetInput, WorkoutService};
