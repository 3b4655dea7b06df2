//! Error handler for converting AppError to HTTP responses.
//!
//! This module implements the IntoResponse trait for AppError and a
//! middleware that normalizes every other error response (router 404s,
//! extractor rejections) into the same JSON shape.

use axum::{
    Json,
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Status code and body for an AppError.
///
/// # Status Code Mapping
/// - NotFound → 404 NOT_FOUND
/// - Duplicate → 400 DUPLICATE_ENTRY
/// - Validation / ValidationErrors → 400 VALIDATION_ERROR
/// - BadRequest → 400 BAD_REQUEST
/// - Database → 500 DATABASE_ERROR
/// - Configuration → 500 CONFIGURATION_ERROR
/// - ConnectionPool → 503 SERVICE_UNAVAILABLE
/// - Internal → 500 INTERNAL_ERROR
fn error_parts(error: &AppError) -> (StatusCode, ErrorResponse) {
    match error {
        AppError::NotFound { entity, field, value } => (
            StatusCode::NOT_FOUND,
            ErrorResponse::not_found_error(entity, field, value),
        ),
        AppError::Duplicate { entity, field, value } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::duplicate_error(entity, field, value),
        ),
        AppError::Validation { field, reason } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::validation_error(field, reason),
        ),
        AppError::ValidationErrors { errors } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("VALIDATION_ERROR", &error.to_string())
                .with_details(json!({ "fields": errors })),
        ),
        AppError::BadRequest { message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("BAD_REQUEST", message),
        ),
        AppError::Database { operation, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("DATABASE_ERROR", &error.to_string())
                .with_details(json!({ "operation": operation })),
        ),
        AppError::Configuration { key, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("CONFIGURATION_ERROR", &error.to_string())
                .with_details(json!({ "key": key })),
        ),
        AppError::ConnectionPool { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable"),
        ),
        AppError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INTERNAL_ERROR", &error.to_string()),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = error_parts(&self);

        if status.is_server_error() {
            tracing::error!(error = ?self, code = %error_response.code, "Request failed");
        } else {
            tracing::debug!(error = %self, code = %error_response.code, "Request rejected");
        }

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    error_parts(error).0
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> String {
    error_parts(error).1.code
}

fn code_for_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::SERVICE_UNAVAILABLE => "SERVICE_UNAVAILABLE",
        s if s.is_server_error() => "INTERNAL_ERROR",
        _ => "UNKNOWN_ERROR",
    }
}

fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "The requested resource was not found",
        StatusCode::METHOD_NOT_ALLOWED => "HTTP method not allowed for this endpoint",
        StatusCode::PAYLOAD_TOO_LARGE => "Request payload too large",
        s if s.is_server_error() => "An internal server error occurred",
        _ => "Bad request - invalid or malformed request",
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// Global error handling middleware.
///
/// Error responses that are not JSON (axum's plain-text rejections, the
/// router's empty 404) are rewritten into an [`ErrorResponse`]. Every JSON
/// error body gets the request id attached.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let json_body = is_json(&response);
    let (mut parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => axum::body::Bytes::new(),
    };

    let mut error_body = if json_body {
        serde_json::from_slice::<Value>(&body_bytes).unwrap_or(Value::Null)
    } else {
        Value::Null
    };

    if !error_body.is_object() {
        let original = String::from_utf8_lossy(&body_bytes).trim().to_string();
        let message = if original.is_empty() {
            default_message(status).to_string()
        } else {
            original
        };
        error_body = serde_json::to_value(ErrorResponse::new(code_for_status(status), &message))
            .unwrap_or(Value::Null);
    }

    if let (Some(id), Some(map)) = (request_id, error_body.as_object_mut()) {
        map.insert("request_id".to_string(), Value::String(id));
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    (parts, Json(error_body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_not_found_status_code() {
        let error = AppError::student_not_found(123);
        assert_eq!(error_to_status_code(&error), StatusCode::NOT_FOUND);
        assert_eq!(error_to_code(&error), "NOT_FOUND");
    }

    #[test]
    fn test_duplicate_is_bad_request() {
        let error = AppError::Duplicate {
            entity: "students".to_string(),
            field: "registration_no".to_string(),
            value: "REG-1".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::BAD_REQUEST);
        assert_eq!(error_to_code(&error), "DUPLICATE_ENTRY");
    }

    #[test]
    fn test_validation_status_codes() {
        let single = AppError::Validation {
            field: "rollback_steps".to_string(),
            reason: "must be positive".to_string(),
        };
        let many = AppError::ValidationErrors { errors: vec![] };
        assert_eq!(error_to_status_code(&single), StatusCode::BAD_REQUEST);
        assert_eq!(error_to_code(&many), "VALIDATION_ERROR");
    }

    #[test]
    fn test_infrastructure_status_codes() {
        let database = AppError::Database {
            operation: "insert student".to_string(),
            source: anyhow::anyhow!("Connection failed"),
        };
        let pool = AppError::ConnectionPool {
            source: anyhow::anyhow!("Pool exhausted"),
        };
        let internal = AppError::Internal {
            source: anyhow::anyhow!("Unexpected error"),
        };
        assert_eq!(error_to_status_code(&database), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_to_code(&database), "DATABASE_ERROR");
        assert_eq!(error_to_status_code(&pool), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error_to_code(&internal), "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_internal_error_body_carries_underlying_message() {
        let error = AppError::Database {
            operation: "list students".to_string(),
            source: anyhow::anyhow!("relation \"students\" does not exist"),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("relation \"students\" does not exist")
        );
    }

    #[tokio::test]
    async fn test_validation_errors_body_lists_fields() {
        let error = AppError::ValidationErrors {
            errors: vec![crate::error::ValidationFieldError::new(
                "student_name",
                "Student name is required",
            )],
        };
        let body = body_json(error.into_response()).await;
        assert_eq!(body["details"]["fields"][0]["field"], "student_name");
        assert_eq!(body["details"]["fields"][0]["message"], "Student name is required");
    }

    #[test]
    fn test_code_for_status() {
        assert_eq!(code_for_status(StatusCode::NOT_FOUND), "NOT_FOUND");
        assert_eq!(code_for_status(StatusCode::BAD_GATEWAY), "INTERNAL_ERROR");
        assert_eq!(code_for_status(StatusCode::IM_A_TEAPOT), "UNKNOWN_ERROR");
    }
}
