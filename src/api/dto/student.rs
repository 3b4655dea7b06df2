//! Student DTOs for API requests and responses.
//!
//! Field names follow the registration form (`studentName`, `fatherContact1`,
//! `class` ...). The form submits unset inputs as `""`; every optional field
//! treats a blank string as absent.

use std::borrow::Cow;
use std::fmt::Display;
use std::str::FromStr;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff_diesel::ToDiesel;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{FeeCategory, Gender, Student, StudentRecord, StudentType, YesNo};
use crate::utils::data_url::validate_image_data_url;

// ============================================================================
// Deserialization helpers
// ============================================================================

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Field validators
// ============================================================================

fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn one_of<T: FromStr + Display>(value: &str, allowed: &[T]) -> Result<(), ValidationError> {
    if value.parse::<T>().is_ok() {
        return Ok(());
    }
    let options: Vec<String> = allowed.iter().map(ToString::to_string).collect();
    Err(ValidationError::new("one_of")
        .with_message(Cow::Owned(format!("must be one of: {}", options.join(", ")))))
}

fn validate_student_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, StudentType::ALL)
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    one_of(value, Gender::ALL)
}

fn validate_fee_category(value: &str) -> Result<(), ValidationError> {
    one_of(value, FeeCategory::ALL)
}

fn validate_yes_no(value: &str) -> Result<(), ValidationError> {
    one_of(value, YesNo::ALL)
}

fn validate_photo(value: &str) -> Result<(), ValidationError> {
    validate_image_data_url(value).map_err(|e| {
        ValidationError::new("data_url").with_message(Cow::Owned(format!("Invalid photo: {e}")))
    })
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for registering or replacing a student.
///
/// Create and update share this shape: update is a full replacement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "validate_required", message = "Registration number is required"),
        length(max = 50, message = "Registration number must be at most 50 characters")
    )]
    #[schema(example = "REG-1001", max_length = 50)]
    pub registration_no: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_student_type"))]
    #[schema(example = "New")]
    pub student_type: Option<String>,

    #[serde(rename = "class", default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50, message = "Class must be at most 50 characters"))]
    #[schema(example = "Class 3")]
    pub class_name: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "validate_required", message = "Student name is required"),
        length(max = 100, message = "Student name must be at most 100 characters")
    )]
    #[schema(example = "Asha Rao", max_length = 100)]
    pub student_name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "validate_required", message = "Father name is required"),
        length(max = 100, message = "Father name must be at most 100 characters")
    )]
    #[schema(example = "Ravi Rao", max_length = 100)]
    pub father_name: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 100, message = "Mother name must be at most 100 characters"))]
    pub mother_name: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "validate_required", message = "Father contact is required"),
        length(max = 15, message = "Father contact must be at most 15 characters")
    )]
    #[schema(example = "9876543210", max_length = 15)]
    pub father_contact1: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 15, message = "Second contact must be at most 15 characters"))]
    pub father_contact2: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(value_type = Option<String>, format = Date, example = "2015-03-21")]
    pub dob: Option<Date>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 100, message = "Date of birth in words must be at most 100 characters"))]
    #[schema(example = "21st March 2015")]
    pub dob_words: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,

    /// Defaults to today on create and to the stored value on update.
    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(value_type = Option<String>, format = Date)]
    pub admission_date: Option<Date>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_fee_category"))]
    pub fee_category: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_yes_no"))]
    pub bus_van: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_yes_no"))]
    pub hostel: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_yes_no"))]
    pub library: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 15, message = "SMS contact must be at most 15 characters"))]
    pub sms_contact: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 100, message = "Village must be at most 100 characters"))]
    pub village: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 100, message = "District must be at most 100 characters"))]
    pub district: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 100, message = "State must be at most 100 characters"))]
    pub state: Option<String>,

    /// Base64 image data URL
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_photo"))]
    pub student_photo: Option<String>,

    /// Base64 image data URL
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_photo"))]
    pub father_photo: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub remarks: Option<String>,
}

impl StudentRequest {
    /// Converts a validated request into the storage record.
    ///
    /// `admission_fallback` is used when the request carries no admission date.
    pub fn into_record(self, admission_fallback: Date) -> StudentRecord {
        StudentRecord {
            registration_no: self.registration_no,
            student_type: self.student_type.and_then(|v| v.parse().ok()),
            class_name: self.class_name,
            student_name: self.student_name,
            father_name: self.father_name,
            mother_name: self.mother_name,
            father_contact1: self.father_contact1,
            father_contact2: self.father_contact2,
            dob: self.dob.map(|d| d.to_diesel()),
            dob_words: self.dob_words,
            gender: self.gender.and_then(|v| v.parse().ok()),
            admission_date: self.admission_date.unwrap_or(admission_fallback).to_diesel(),
            fee_category: self.fee_category.and_then(|v| v.parse().ok()),
            bus_van: self.bus_van.and_then(|v| v.parse().ok()),
            hostel: self.hostel.and_then(|v| v.parse().ok()),
            library: self.library.and_then(|v| v.parse().ok()),
            sms_contact: self.sms_contact,
            address: self.address,
            village: self.village,
            district: self.district,
            state: self.state,
            student_photo: self.student_photo,
            father_photo: self.father_photo,
            remarks: self.remarks,
        }
    }
}

impl From<StudentResponse> for StudentRequest {
    /// Starts an edit from a stored record.
    fn from(student: StudentResponse) -> Self {
        Self {
            registration_no: student.registration_no,
            student_type: student.student_type.map(|v| v.to_string()),
            class_name: student.class_name,
            student_name: student.student_name,
            father_name: student.father_name,
            mother_name: student.mother_name,
            father_contact1: student.father_contact1,
            father_contact2: student.father_contact2,
            dob: student.dob,
            dob_words: student.dob_words,
            gender: student.gender.map(|v| v.to_string()),
            admission_date: Some(student.admission_date),
            fee_category: student.fee_category.map(|v| v.to_string()),
            bus_van: student.bus_van.map(|v| v.to_string()),
            hostel: student.hostel.map(|v| v.to_string()),
            library: student.library.map(|v| v.to_string()),
            sms_contact: student.sms_contact,
            address: student.address,
            village: student.village,
            district: student.district,
            state: student.state,
            student_photo: student.student_photo,
            father_photo: student.father_photo,
            remarks: student.remarks,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// A stored student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: i32,
    pub registration_no: String,
    pub student_type: Option<StudentType>,
    #[serde(rename = "class")]
    pub class_name: Option<String>,
    pub student_name: String,
    pub father_name: String,
    pub mother_name: Option<String>,
    pub father_contact1: String,
    pub father_contact2: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub dob: Option<Date>,
    pub dob_words: Option<String>,
    pub gender: Option<Gender>,
    #[schema(value_type = String, format = Date)]
    pub admission_date: Date,
    pub fee_category: Option<FeeCategory>,
    pub bus_van: Option<YesNo>,
    pub hostel: Option<YesNo>,
    pub library: Option<YesNo>,
    pub sms_contact: Option<String>,
    pub address: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub student_photo: Option<String>,
    pub father_photo: Option<String>,
    pub remarks: Option<String>,
    #[serde(rename = "created_at")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[serde(rename = "updated_at")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            registration_no: student.registration_no,
            student_type: student.student_type,
            class_name: student.class_name,
            student_name: student.student_name,
            father_name: student.father_name,
            mother_name: student.mother_name,
            father_contact1: student.father_contact1,
            father_contact2: student.father_contact2,
            dob: student.dob.map(|d| d.to_jiff()),
            dob_words: student.dob_words,
            gender: student.gender,
            admission_date: student.admission_date.to_jiff(),
            fee_category: student.fee_category,
            bus_van: student.bus_van,
            hostel: student.hostel,
            library: student.library,
            sms_contact: student.sms_contact,
            address: student.address,
            village: student.village,
            district: student.district,
            state: student.state,
            student_photo: student.student_photo,
            father_photo: student.father_photo,
            remarks: student.remarks,
            created_at: student.created_at.to_jiff(),
            updated_at: student.updated_at.to_jiff(),
        }
    }
}

/// Response body for a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteStudentResponse {
    #[schema(example = "Student deleted")]
    pub message: String,
    pub student: StudentResponse,
}

/// Plain status message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use jiff::civil::date;
    use serde_json::json;

    fn valid_body() -> serde_json::Value {
        json!({
            "registrationNo": "REG-1001",
            "studentType": "New",
            "class": "Class 3",
            "studentName": "Asha Rao",
            "fatherName": "Ravi Rao",
            "motherName": "",
            "fatherContact1": "9876543210",
            "fatherContact2": "",
            "dob": "2015-03-21",
            "dobWords": "21st March 2015",
            "gender": "Female",
            "admissionDate": "",
            "feeCategory": "General",
            "busVan": "Yes",
            "hostel": "",
            "library": "No",
            "studentPhoto": null,
            "fatherPhoto": null
        })
    }

    fn field_names(request: &StudentRequest) -> Vec<String> {
        match AppError::from(request.validate().unwrap_err()) {
            AppError::ValidationErrors { errors } => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("Expected ValidationErrors, got {other:?}"),
        }
    }

    #[test]
    fn test_form_payload_blank_strings_become_none() {
        let request: StudentRequest = serde_json::from_value(valid_body()).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.mother_name, None);
        assert_eq!(request.hostel, None);
        assert_eq!(request.admission_date, None);
        assert_eq!(request.dob, Some(date(2015, 3, 21)));
        assert_eq!(request.class_name.as_deref(), Some("Class 3"));
    }

    #[test]
    fn test_into_record_defaults_admission_date_and_parses_enums() {
        let request: StudentRequest = serde_json::from_value(valid_body()).unwrap();
        let record = request.into_record(date(2024, 6, 1));
        assert_eq!(record.admission_date.to_jiff(), date(2024, 6, 1));
        assert_eq!(record.student_type, Some(StudentType::New));
        assert_eq!(record.gender, Some(Gender::Female));
        assert_eq!(record.bus_van, Some(YesNo::Yes));
        assert_eq!(record.hostel, None);
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let request: StudentRequest =
            serde_json::from_value(json!({ "registrationNo": "REG-1", "studentName": "  " }))
                .unwrap();
        assert_eq!(
            field_names(&request),
            vec!["father_contact1", "father_name", "student_name"]
        );
    }

    #[test]
    fn test_null_required_field_is_a_validation_error() {
        let mut body = valid_body();
        body["studentName"] = serde_json::Value::Null;
        let request: StudentRequest = serde_json::from_value(body).unwrap();
        assert_eq!(field_names(&request), vec!["student_name"]);
    }

    #[test]
    fn test_out_of_set_select_value_is_rejected() {
        let mut body = valid_body();
        body["feeCategory"] = json!("Premium");
        body["gender"] = json!("female");
        body["studentType"] = json!("Transfer");
        let request: StudentRequest = serde_json::from_value(body).unwrap();
        assert_eq!(
            field_names(&request),
            vec!["fee_category", "gender", "student_type"]
        );
    }

    #[test]
    fn test_length_limits() {
        let mut body = valid_body();
        body["fatherContact1"] = json!("1234567890123456");
        body["registrationNo"] = json!("R".repeat(51));
        let request: StudentRequest = serde_json::from_value(body).unwrap();
        assert_eq!(field_names(&request), vec!["father_contact1", "registration_no"]);
    }

    #[test]
    fn test_photo_must_be_image_data_url() {
        let mut body = valid_body();
        body["studentPhoto"] = json!("data:image/png;base64,iVBORw0KGgo=");
        body["fatherPhoto"] = json!("data:application/pdf;base64,JVBERi0=");
        let request: StudentRequest = serde_json::from_value(body).unwrap();
        assert_eq!(field_names(&request), vec!["father_photo"]);
    }

    #[test]
    fn test_invalid_date_fails_deserialization() {
        let mut body = valid_body();
        body["dob"] = json!("21/03/2015");
        assert!(serde_json::from_value::<StudentRequest>(body).is_err());
    }

    #[test]
    fn test_response_uses_form_keys() {
        let response = StudentResponse {
            id: 1,
            registration_no: "REG-1001".to_string(),
            student_type: Some(StudentType::New),
            class_name: Some("Class 3".to_string()),
            student_name: "Asha Rao".to_string(),
            father_name: "Ravi Rao".to_string(),
            mother_name: None,
            father_contact1: "9876543210".to_string(),
            father_contact2: None,
            dob: None,
            dob_words: None,
            gender: None,
            admission_date: date(2024, 6, 1),
            fee_category: None,
            bus_van: Some(YesNo::No),
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
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["registrationNo"], "REG-1001");
        assert_eq!(value["class"], "Class 3");
        assert_eq!(value["fatherContact1"], "9876543210");
        assert_eq!(value["busVan"], "No");
        assert_eq!(value["admissionDate"], "2024-06-01");
        assert!(value.get("created_at").is_some());

        let edit = StudentRequest::from(response);
        assert_eq!(edit.bus_van.as_deref(), Some("No"));
        assert_eq!(edit.admission_date, Some(date(2024, 6, 1)));
    }
}
