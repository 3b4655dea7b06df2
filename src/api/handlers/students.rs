//! Student API handlers.
//!
//! Create and update accept the registration form payload; update replaces
//! every mutable field.

use crate::api::doc::STUDENT_TAG;
use crate::api::dto::{DeleteStudentResponse, ErrorResponse, StudentRequest, StudentResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use jiff::Zoned;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates student routes.
///
/// Routes:
/// - GET /api/students                  - List students, newest first
/// - POST /api/students                 - Register a student
/// - GET /api/students/{id}             - Get student by ID
/// - PUT /api/students/{id}             - Replace a student
/// - DELETE /api/students/{id}          - Delete a student
/// - GET /api/students/search/{query}   - Free-text search
/// - GET /api/students/search?q=...     - Same search for queries that cannot be
///                                        a path segment (`.`, `..`)
pub fn student_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_students, create_student))
        .routes(routes!(get_student, update_student, delete_student))
        .routes(routes!(search_students))
        .routes(routes!(search_students_by_param))
}

fn into_responses(students: Vec<crate::models::Student>) -> Vec<StudentResponse> {
    students.into_iter().map(StudentResponse::from).collect()
}

/// GET /api/students - List all students
#[utoipa::path(
    get,
    path = "/api/students",
    tag = STUDENT_TAG,
    responses(
        (status = 200, description = "All students, newest first", body = Vec<StudentResponse>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn list_students(State(state): State<AppState>) -> AppResult<Json<Vec<StudentResponse>>> {
    let students = state.services.students.list_students().await?;
    Ok(Json(into_responses(students)))
}

/// POST /api/students - Register a student
///
/// `admissionDate` defaults to today when omitted.
#[utoipa::path(
    post,
    path = "/api/students",
    tag = STUDENT_TAG,
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Student registered", body = StudentResponse),
        (status = 400, description = "Validation failure or duplicate registration number", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StudentRequest>,
) -> AppResult<(StatusCode, Json<StudentResponse>)> {
    let record = payload.into_record(Zoned::now().date());
    let student = state.services.students.create_student(record).await?;
    Ok((StatusCode::CREATED, Json(StudentResponse::from(student))))
}

/// GET /api/students/{id} - Get student by ID
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    tag = STUDENT_TAG,
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student found", body = StudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    )
)]
async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<StudentResponse>> {
    let student = state.services.students.get_student(id).await?;
    Ok(Json(StudentResponse::from(student)))
}

/// PUT /api/students/{id} - Replace a student
///
/// An omitted `admissionDate` keeps the stored one.
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    tag = STUDENT_TAG,
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Validation failure or duplicate registration number", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    )
)]
async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<StudentRequest>,
) -> AppResult<Json<StudentResponse>> {
    let existing = state.services.students.get_student(id).await?;
    let record = payload.into_record(existing.admission_date.to_jiff());
    let student = state.services.students.update_student(id, record).await?;
    Ok(Json(StudentResponse::from(student)))
}

/// DELETE /api/students/{id} - Delete a student
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    tag = STUDENT_TAG,
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student deleted", body = DeleteStudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    )
)]
async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteStudentResponse>> {
    let student = state.services.students.delete_student(id).await?;
    Ok(Json(DeleteStudentResponse {
        message: "Student deleted".to_string(),
        student: StudentResponse::from(student),
    }))
}

/// GET /api/students/search/{query} - Search students
///
/// Case-insensitive substring match on student name, registration number,
/// father's name and father's primary contact.
#[utoipa::path(
    get,
    path = "/api/students/search/{query}",
    tag = STUDENT_TAG,
    params(
        ("query" = String, Path, description = "Text to look for")
    ),
    responses(
        (status = 200, description = "Matching students, newest first", body = Vec<StudentResponse>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn search_students(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> AppResult<Json<Vec<StudentResponse>>> {
    let students = state.services.students.search_students(&query).await?;
    Ok(Json(into_responses(students)))
}

/// Query string of `GET /api/students/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// GET /api/students/search - Search by query parameter
///
/// `.` and `..` are normalized away as path segments, so those queries travel
/// as `?q=`. Without `q` the empty query matches every student.
#[utoipa::path(
    get,
    path = "/api/students/search",
    tag = STUDENT_TAG,
    params(
        ("q" = Option<String>, Query, description = "Text to look for")
    ),
    responses(
        (status = 200, description = "Matching students, newest first", body = Vec<StudentResponse>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn search_students_by_param(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<StudentResponse>>> {
    let query = params.q.unwrap_or_default();
    let students = state.services.students.search_students(&query).await?;
    Ok(Json(into_responses(students)))
}
