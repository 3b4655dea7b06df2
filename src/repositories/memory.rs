//! In-memory student repository.
//!
//! Mirrors the PostgreSQL repository: serial ids that are never reused, a
//! unique registration number and newest-first ordering.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use jiff_diesel::ToDiesel;

use super::StudentStore;
use crate::error::{AppError, AppResult};
use crate::models::{Student, StudentRecord};

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Student>,
}

impl Table {
    fn registration_taken(&self, registration_no: &str, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|s| s.registration_no == registration_no && Some(s.id) != except)
    }
}

/// Process-local student store guarded by a single mutex.
#[derive(Default)]
pub struct MemoryStudentRepository {
    table: Mutex<Table>,
}

impl MemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Table>> {
        self.table.lock().map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("student table lock poisoned: {}", e),
        })
    }
}

fn duplicate_registration(registration_no: &str) -> AppError {
    AppError::Duplicate {
        entity: "students".to_string(),
        field: "registration_no".to_string(),
        value: registration_no.to_string(),
    }
}

/// Current time, nudged forward so it is strictly after `previous`.
fn tick_after(previous: Timestamp) -> Timestamp {
    let now = Timestamp::now();
    if now > previous {
        now
    } else {
        previous
            .checked_add(SignedDuration::from_micros(1))
            .unwrap_or(now)
    }
}

fn newest_first(mut students: Vec<Student>) -> Vec<Student> {
    students.sort_by(|a, b| {
        b.created_at
            .to_jiff()
            .cmp(&a.created_at.to_jiff())
            .then(b.id.cmp(&a.id))
    });
    students
}

#[async_trait]
impl StudentStore for MemoryStudentRepository {
    async fn create(&self, record: StudentRecord) -> AppResult<Student> {
        let mut table = self.lock()?;
        if table.registration_taken(&record.registration_no, None) {
            return Err(duplicate_registration(&record.registration_no));
        }

        table.last_id += 1;
        let id = table.last_id;
        let now = Timestamp::now().to_diesel();
        let student = Student::from_record(id, record, now, now);
        table.rows.insert(id, student.clone());
        Ok(student)
    }

    async fn find_by_id(&self, student_id: i32) -> AppResult<Option<Student>> {
        let table = self.lock()?;
        Ok(table.rows.get(&student_id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Student>> {
        let table = self.lock()?;
        Ok(newest_first(table.rows.values().cloned().collect()))
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Student>> {
        let needle = query.to_lowercase();
        let table = self.lock()?;
        let hits = table
            .rows
            .values()
            .filter(|s| {
                [
                    s.student_name.as_str(),
                    s.registration_no.as_str(),
                    s.father_name.as_str(),
                    s.father_contact1.as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        Ok(newest_first(hits))
    }

    async fn update(&self, student_id: i32, record: StudentRecord) -> AppResult<Option<Student>> {
        let mut table = self.lock()?;
        if table.registration_taken(&record.registration_no, Some(student_id)) {
            return Err(duplicate_registration(&record.registration_no));
        }

        let Some(existing) = table.rows.get_mut(&student_id) else {
            return Ok(None);
        };
        let updated_at = tick_after(existing.updated_at.to_jiff()).to_diesel();
        *existing = Student::from_record(student_id, record, existing.created_at, updated_at);
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, student_id: i32) -> AppResult<Option<Student>> {
        let mut table = self.lock()?;
        Ok(table.rows.remove(&student_id))
    }

    async fn ping(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
