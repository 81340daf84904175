#![forbid(unsafe_code)]

pub mod error;
pub mod routes;

use services::{AppServices, Clock};

pub use error::ApiError;
pub use routes::router;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: AppServices,
    pub clock: Clock,
}

impl AppState {
    #[must_use]
    pub fn new(services: AppServices, clock: Clock) -> Self {
        Self { services, clock }
    }
}
