//! Repository layer for data access operations.
//!
//! Student persistence sits behind [`StudentStore`] so the service layer does
//! not care whether rows live in PostgreSQL or in process memory.

mod memory;
mod student_repo;

pub use memory::MemoryStudentRepository;
pub use student_repo::StudentRepository;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::settings::{DatabaseConfig, StorageBackend};
use crate::db::{AsyncDbPool, establish_async_connection_pool};
use crate::error::AppResult;
use crate::models::{Student, StudentRecord};

/// Storage operations for student records.
///
/// Listing and search results are ordered newest first
/// (`created_at DESC, id DESC`).
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Inserts a record and returns it with its assigned id and timestamps.
    async fn create(&self, record: StudentRecord) -> AppResult<Student>;

    async fn find_by_id(&self, student_id: i32) -> AppResult<Option<Student>>;

    async fn list_all(&self) -> AppResult<Vec<Student>>;

    /// Case-insensitive substring match on name, registration number,
    /// father's name and father's primary contact.
    async fn search(&self, query: &str) -> AppResult<Vec<Student>>;

    /// Replaces every mutable column; `None` if no row has this id.
    async fn update(&self, student_id: i32, record: StudentRecord) -> AppResult<Option<Student>>;

    /// Removes the row and returns its last state; `None` if no row has this id.
    async fn delete(&self, student_id: i32) -> AppResult<Option<Student>>;

    /// Round-trips to the backing store.
    async fn ping(&self) -> AppResult<()>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// Escapes `\`, `%` and `_` so user input is matched literally by (I)LIKE.
pub fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Aggregates all repositories for convenient access.
///
/// Cloning is cheap: the store is shared behind an `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub students: Arc<dyn StudentStore>,
}

impl Repositories {
    /// Creates repositories backed by PostgreSQL.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            students: Arc::new(StudentRepository::new(pool)),
        }
    }

    /// Creates repositories backed by process memory.
    pub fn in_memory() -> Self {
        Self {
            students: Arc::new(MemoryStudentRepository::new()),
        }
    }

    /// Builds the repositories selected by `database.backend`.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            StorageBackend::Postgres => {
                let pool = establish_async_connection_pool(config).await?;
                Ok(Self::new(pool))
            }
            StorageBackend::Memory => Ok(Self::in_memory()),
        }
    }
}
