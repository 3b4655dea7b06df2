//! The registration form, described once as data.
//!
//! Every front end renders and validates from [`REGISTRATION_FORM`] rather
//! than repeating the field list.

use jiff::Timestamp;
use jiff::civil::Date;

use crate::api::dto::StudentRequest;
use crate::client::dob::date_to_words;
use crate::client::error::{ClientError, ClientResult};
use crate::models::{FeeCategory, Gender, StudentType, YesNo};

const CLASSES: &[&str] = &[
    "Nursery", "KG", "Class 1", "Class 2", "Class 3", "Class 4", "Class 5", "Class 6", "Class 7",
    "Class 8", "Class 9", "Class 10",
];

const STUDENT_TYPES: &[&str] = &[StudentType::New.as_str(), StudentType::Old.as_str()];

const GENDERS: &[&str] = &[
    Gender::Male.as_str(),
    Gender::Female.as_str(),
    Gender::Other.as_str(),
];

const FEE_CATEGORIES: &[&str] = &[
    FeeCategory::General.as_str(),
    FeeCategory::Subsidized.as_str(),
    FeeCategory::Free.as_str(),
    FeeCategory::Special.as_str(),
];

const YES_NO: &[&str] = &[YesNo::Yes.as_str(), YesNo::No.as_str()];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Tel,
    Date,
    /// Recomputed from another field, never typed by the user
    Derived,
    Select(&'static [&'static str]),
    TextArea,
    Photo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    /// JSON key sent to the API
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(label: &'static str, key: &'static str, kind: FieldKind, required: bool) -> FormField {
    FormField {
        label,
        key,
        kind,
        required,
    }
}

pub const REGISTRATION_FORM: &[FormField] = &[
    field("Registration No.", "registrationNo", FieldKind::Text, true),
    field("Student Type", "studentType", FieldKind::Select(STUDENT_TYPES), false),
    field("Class", "class", FieldKind::Select(CLASSES), true),
    field("Student Name", "studentName", FieldKind::Text, true),
    field("Father's Name", "fatherName", FieldKind::Text, true),
    field("Mother's Name", "motherName", FieldKind::Text, false),
    field("Father Contact No. 1", "fatherContact1", FieldKind::Tel, true),
    field("Father Contact No. 2", "fatherContact2", FieldKind::Tel, false),
    field("SMS Contact No.", "smsContact", FieldKind::Tel, false),
    field("Date of Birth", "dob", FieldKind::Date, false),
    field("Date of Birth (In Words)", "dobWords", FieldKind::Derived, false),
    field("Gender", "gender", FieldKind::Select(GENDERS), false),
    field("Date of Admission", "admissionDate", FieldKind::Date, false),
    field("Fee Category", "feeCategory", FieldKind::Select(FEE_CATEGORIES), false),
    field("Bus/Van Service", "busVan", FieldKind::Select(YES_NO), false),
    field("Hostel", "hostel", FieldKind::Select(YES_NO), false),
    field("Library", "library", FieldKind::Select(YES_NO), false),
    field("Student Address", "address", FieldKind::TextArea, false),
    field("Village/City", "village", FieldKind::Text, false),
    field("District", "district", FieldKind::Text, false),
    field("State", "state", FieldKind::Text, false),
    field("Student Photo", "studentPhoto", FieldKind::Photo, false),
    field("Father Photo", "fatherPhoto", FieldKind::Photo, false),
    field("Remarks", "remarks", FieldKind::TextArea, false),
];

impl FormField {
    /// Current value of this field in `request`, `None` when unset or blank.
    pub fn value(&self, request: &StudentRequest) -> Option<String> {
        let value = match self.key {
            "registrationNo" => Some(request.registration_no.clone()),
            "studentType" => request.student_type.clone(),
            "class" => request.class_name.clone(),
            "studentName" => Some(request.student_name.clone()),
            "fatherName" => Some(request.father_name.clone()),
            "motherName" => request.mother_name.clone(),
            "fatherContact1" => Some(request.father_contact1.clone()),
            "fatherContact2" => request.father_contact2.clone(),
            "smsContact" => request.sms_contact.clone(),
            "dob" => request.dob.map(|d| d.to_string()),
            "dobWords" => request.dob_words.clone(),
            "gender" => request.gender.clone(),
            "admissionDate" => request.admission_date.map(|d| d.to_string()),
            "feeCategory" => request.fee_category.clone(),
            "busVan" => request.bus_van.clone(),
            "hostel" => request.hostel.clone(),
            "library" => request.library.clone(),
            "address" => request.address.clone(),
            "village" => request.village.clone(),
            "district" => request.district.clone(),
            "state" => request.state.clone(),
            "studentPhoto" => request.student_photo.clone(),
            "fatherPhoto" => request.father_photo.clone(),
            "remarks" => request.remarks.clone(),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// Checks required fields and select options before anything is sent.
pub fn validate_form(request: &StudentRequest) -> ClientResult<()> {
    let missing: Vec<&str> = REGISTRATION_FORM
        .iter()
        .filter(|f| f.required && f.value(request).is_none())
        .map(|f| f.label)
        .collect();

    if !missing.is_empty() {
        return Err(ClientError::Form(format!(
            "Please fill all required fields: {}",
            missing.join(", ")
        )));
    }

    for field in REGISTRATION_FORM {
        if let (FieldKind::Select(options), Some(value)) = (field.kind, field.value(request)) {
            if !options.contains(&value.as_str()) {
                return Err(ClientError::Form(format!(
                    "{} must be one of: {}",
                    field.label,
                    options.join(", ")
                )));
            }
        }
    }

    Ok(())
}

/// An empty registration with the form's defaults filled in.
pub fn new_registration(now: Timestamp, today: Date) -> StudentRequest {
    StudentRequest {
        registration_no: default_registration_no(now),
        admission_date: Some(today),
        ..StudentRequest::default()
    }
}

/// `REG-<unix millis>`
pub fn default_registration_no(now: Timestamp) -> String {
    format!("REG-{}", now.as_millisecond())
}

/// Sets the date of birth and keeps `dobWords` in step with it.
pub fn set_dob(request: &mut StudentRequest, dob: Option<Date>) {
    request.dob = dob;
    request.dob_words = dob.map(date_to_words);
}
