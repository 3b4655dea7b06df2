//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `student` - Student request/response DTOs
//! - `health` - Health check DTOs
//! - `error` - Common error response DTOs

mod error;
mod health;
mod student;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use student::{DeleteStudentResponse, MessageResponse, StudentRequest, StudentResponse};
