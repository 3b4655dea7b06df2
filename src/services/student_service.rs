//! Student service for business logic operations.
//!
//! Wraps the configured [`StudentStore`] and turns missing rows into
//! `NotFound` errors.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Student, StudentRecord};
use crate::repositories::StudentStore;

/// Student service for handling student-related business logic.
///
/// Cloning is cheap; the store is shared behind an `Arc`.
#[derive(Clone)]
pub struct StudentService {
    store: Arc<dyn StudentStore>,
}

impl StudentService {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    /// Registers a new student.
    ///
    /// Fails with `Duplicate` when the registration number is already taken.
    pub async fn create_student(&self, record: StudentRecord) -> AppResult<Student> {
        let student = self.store.create(record).await?;
        tracing::info!(
            student_id = student.id,
            registration_no = %student.registration_no,
            "Student registered"
        );
        Ok(student)
    }

    /// Gets a student by id, or `NotFound`.
    pub async fn get_student(&self, id: i32) -> AppResult<Student> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::student_not_found(id))
    }

    /// Lists every student, newest first.
    pub async fn list_students(&self) -> AppResult<Vec<Student>> {
        self.store.list_all().await
    }

    /// Free-text search; an empty query is passed through unchanged.
    pub async fn search_students(&self, query: &str) -> AppResult<Vec<Student>> {
        self.store.search(query).await
    }

    /// Replaces every mutable field of an existing student.
    pub async fn update_student(&self, id: i32, record: StudentRecord) -> AppResult<Student> {
        let student = self
            .store
            .update(id, record)
            .await?
            .ok_or_else(|| AppError::student_not_found(id))?;
        tracing::info!(student_id = id, "Student updated");
        Ok(student)
    }

    /// Deletes a student and returns the removed record.
    pub async fn delete_student(&self, id: i32) -> AppResult<Student> {
        let student = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| AppError::student_not_found(id))?;
        tracing::info!(student_id = id, "Student deleted");
        Ok(student)
    }

    /// Checks that the backing store answers.
    pub async fn check_storage(&self) -> AppResult<()> {
        self.store.ping().await
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStudentRepository;
    use jiff::civil::date;
    use jiff_diesel::ToDiesel;

    fn service() -> StudentService {
        StudentService::new(Arc::new(MemoryStudentRepository::new()))
    }

    fn record(registration_no: &str) -> StudentRecord {
        StudentRecord {
            registration_no: registration_no.to_string(),
            student_type: None,
            class_name: None,
            student_name: "Asha Rao".to_string(),
            father_name: "Ravi Rao".to_string(),
            mother_name: None,
            father_contact1: "9876543210".to_string(),
            father_contact2: None,
            dob: None,
            dob_words: None,
            gender: None,
            admission_date: date(2024, 6, 1).to_diesel(),
            fee_category: None,
            bus_van: None,
            hostel: None,
            library: None,
            sms_contact: None,
            address: None,
            village: None,
            district: None,
            state: None,
            student_photo: None,
            father_photo: None,
            remarks: None,
        }
    }

    #[tokio::test]
    async fn test_get_missing_student_is_not_found() {
        let err = service().get_student(7).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { ref value, .. } if value == "7"));
    }

    #[tokio::test]
    async fn test_update_missing_student_is_not_found() {
        let err = service().update_student(7, record("REG-7")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot_then_not_found() {
        let service = service();
        let created = service.create_student(record("REG-1")).await.unwrap();
        let deleted = service.delete_student(created.id).await.unwrap();
        assert_eq!(deleted.registration_no, "REG-1");
        assert!(matches!(
            service.delete_student(created.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
        assert!(service.list_students().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_check_storage_on_memory_backend() {
        let service = service();
        assert!(service.check_storage().await.is_ok());
        assert_eq!(service.backend(), "memory");
    }
}
