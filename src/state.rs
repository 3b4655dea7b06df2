//! Application state for Axum web framework.
//!
//! Contains shared services that are accessible across all request handlers.

use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services.
///
/// Cloning is cheap since the services share their stores through `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
}

impl AppState {
    /// Creates a new AppState from the configured repositories.
    ///
    /// # Example
    /// ```ignore
    /// let repos = Repositories::from_config(&settings.database).await?;
    /// let state = AppState::new(repos);
    /// ```
    pub fn new(repos: Repositories) -> Self {
        Self {
            services: Services::new(repos),
        }
    }
}
