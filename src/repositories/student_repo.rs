//! Student repository for async database operations.
//!
//! Provides CRUD and search operations for the students table using diesel_async.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::{StudentStore, escape_like};
use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{Student, StudentRecord};

/// PostgreSQL-backed student repository.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct StudentRepository {
    pool: AsyncDbPool,
}

impl StudentRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for StudentRepository {
    async fn create(&self, record: StudentRecord) -> AppResult<Student> {
        use crate::schema::students::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(students)
            .values(&record)
            .returning(Student::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert student"))
    }

    async fn find_by_id(&self, student_id: i32) -> AppResult<Option<Student>> {
        use crate::schema::students::dsl::*;
        let mut conn = self.pool.get().await?;

        students
            .filter(id.eq(student_id))
            .select(Student::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list_all(&self) -> AppResult<Vec<Student>> {
        use crate::schema::students::dsl::*;
        let mut conn = self.pool.get().await?;

        students
            .select(Student::as_select())
            .order((created_at.desc(), id.desc()))
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list students"))
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Student>> {
        use crate::schema::students::dsl::*;
        let mut conn = self.pool.get().await?;
        let pattern = format!("%{}%", escape_like(query));

        students
            .filter(
                student_name
                    .ilike(&pattern)
                    .or(registration_no.ilike(&pattern))
                    .or(father_name.ilike(&pattern))
                    .or(father_contact1.ilike(&pattern)),
            )
            .select(Student::as_select())
            .order((created_at.desc(), id.desc()))
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "search students"))
    }

    async fn update(&self, student_id: i32, record: StudentRecord) -> AppResult<Option<Student>> {
        use crate::schema::students::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(students.filter(id.eq(student_id)))
            .set((&record, updated_at.eq(diesel::dsl::now)))
            .returning(Student::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update student"))
    }

    async fn delete(&self, student_id: i32) -> AppResult<Option<Student>> {
        use crate::schema::students::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(students.filter(id.eq(student_id)))
            .returning(Student::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete student"))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "ping database"))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
