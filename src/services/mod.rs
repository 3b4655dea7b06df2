//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod student_service;

pub use student_service::StudentService;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since the underlying stores are shared.
#[derive(Clone)]
pub struct Services {
    pub students: StudentService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories) -> Self {
        Self {
            students: StudentService::new(repos.students),
        }
    }
}
