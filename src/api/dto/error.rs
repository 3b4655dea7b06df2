//! Error response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Standard error response format.
///
/// The human-readable message lives under `error`, which is what the
/// registration form reads when a request fails.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "NOT_FOUND")]
    pub code: String,
    #[schema(example = "Student not found")]
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            error: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    pub fn not_found_error(entity: &str, field: &str, value: &str) -> Self {
        let message = if entity == "student" {
            "Student not found".to_string()
        } else {
            format!("{} not found", entity)
        };
        Self::new("NOT_FOUND", &message).with_details(serde_json::json!({
            "entity": entity,
            "field": field,
            "value": value,
        }))
    }

    pub fn duplicate_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new(
            "DUPLICATE_ENTRY",
            &format!("{} '{}' already exists", field, value),
        )
        .with_details(serde_json::json!({
            "entity": entity,
            "field": field,
            "value": value,
        }))
    }

    pub fn validation_error(field: &str, reason: &str) -> Self {
        Self::new("VALIDATION_ERROR", &format!("{}: {}", field, reason)).with_details(
            serde_json::json!({
                "fields": [{ "field": field, "message": reason }],
            }),
        )
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Adds request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_not_found_message() {
        let response = ErrorResponse::not_found_error("student", "id", "1");
        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.error, "Student not found");
        assert_eq!(response.details.unwrap()["value"], "1");
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_value(ErrorResponse::new("BAD_REQUEST", "oops")).unwrap();
        assert_eq!(json, serde_json::json!({ "code": "BAD_REQUEST", "error": "oops" }));
    }

    #[test]
    fn test_with_request_id() {
        let response = ErrorResponse::new("INTERNAL_ERROR", "boom").with_request_id("abc");
        assert_eq!(response.request_id.as_deref(), Some("abc"));
    }
}
