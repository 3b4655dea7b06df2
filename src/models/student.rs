//! Student record models for database operations.
//!
//! Select-like form fields are stored as plain text columns and mapped onto
//! small enums here, so both storage backends share one set of values.

use diesel::AsExpression;
use diesel::FromSqlRow;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use jiff_diesel::{Date, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Error returned when a text value is outside an enum's allowed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unrecognized {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

// Declares a text-backed enum together with its diesel and string conversions.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Serialize,
            Deserialize,
            utoipa::ToSchema,
            AsExpression,
            FromSqlRow,
        )]
        #[diesel(sql_type = Text)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl diesel::query_builder::QueryId for $name {
            type QueryId = $name;
            const HAS_STATIC_QUERY_ID: bool = false;
        }

        impl ToSql<Text, Pg> for $name {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                out.write_all(self.as_str().as_bytes())?;
                Ok(serialize::IsNull::No)
            }
        }

        impl FromSql<Text, Pg> for $name {
            fn from_sql(
                bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
            ) -> deserialize::Result<Self> {
                let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
                s.parse::<$name>().map_err(Into::into)
            }
        }
    };
}

text_enum!(
    /// Whether the student is newly admitted or continuing
    StudentType, "student_type", {
        New => "New",
        Old => "Old",
    }
);

text_enum!(
    Gender, "gender", {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
);

text_enum!(
    /// Fee schedule applied to the student
    FeeCategory, "fee_category", {
        General => "General",
        Subsidized => "Subsidized",
        Free => "Free",
        Special => "Special",
    }
);

text_enum!(
    /// Answer for the bus/van, hostel and library facility flags
    YesNo, "yes_no", {
        Yes => "Yes",
        No => "No",
    }
);

/// Student model for reading from database
#[derive(Debug, Queryable, Selectable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Student {
    pub id: i32,
    pub registration_no: String,
    pub student_type: Option<StudentType>,
    pub class_name: Option<String>,
    pub student_name: String,
    pub father_name: String,
    pub mother_name: Option<String>,
    pub father_contact1: String,
    pub father_contact2: Option<String>,
    pub dob: Option<Date>,
    pub dob_words: Option<String>,
    pub gender: Option<Gender>,
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
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Every mutable column of a student record.
///
/// Used as the insert payload and as the full-replace changeset; `None`
/// clears the column on update instead of leaving it untouched.
#[derive(Debug, Insertable, AsChangeset, Clone, PartialEq)]
#[diesel(table_name = crate::schema::students)]
#[diesel(treat_none_as_null = true)]
pub struct StudentRecord {
    pub registration_no: String,
    pub student_type: Option<StudentType>,
    pub class_name: Option<String>,
    pub student_name: String,
    pub father_name: String,
    pub mother_name: Option<String>,
    pub father_contact1: String,
    pub father_contact2: Option<String>,
    pub dob: Option<Date>,
    pub dob_words: Option<String>,
    pub gender: Option<Gender>,
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
}

impl Student {
    /// Builds a stored row from a record; used by backends that assign ids themselves.
    pub fn from_record(id: i32, record: StudentRecord, created_at: Timestamp, updated_at: Timestamp) -> Self {
        let StudentRecord {
            registration_no,
            student_type,
            class_name,
            student_name,
            father_name,
            mother_name,
            father_contact1,
            father_contact2,
            dob,
            dob_words,
            gender,
            admission_date,
            fee_category,
            bus_van,
            hostel,
            library,
            sms_contact,
            address,
            village,
            district,
            state,
            student_photo,
            father_photo,
            remarks,
        } = record;

        Self {
            id,
            registration_no,
            student_type,
            class_name,
            student_name,
            father_name,
            mother_name,
            father_contact1,
            father_contact2,
            dob,
            dob_words,
            gender,
            admission_date,
            fee_category,
            bus_van,
            hostel,
            library,
            sms_contact,
            address,
            village,
            district,
            state,
            student_photo,
            father_photo,
            remarks,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_text_round_trip() {
        for value in FeeCategory::ALL {
            assert_eq!(value.as_str().parse::<FeeCategory>(), Ok(*value));
        }
        assert_eq!("Yes".parse::<YesNo>(), Ok(YesNo::Yes));
        assert_eq!(Gender::Other.to_string(), "Other");
    }

    #[test]
    fn test_enum_rejects_unknown_and_lowercase_text() {
        let err = "new".parse::<StudentType>().unwrap_err();
        assert_eq!(err.kind, "student_type");
        assert_eq!(err.to_string(), "Unrecognized student_type: new");
        assert!("".parse::<YesNo>().is_err());
    }

    #[test]
    fn test_enum_serializes_as_form_value() {
        assert_eq!(serde_json::to_string(&FeeCategory::Subsidized).unwrap(), "\"Subsidized\"");
        let parsed: Gender = serde_json::from_str("\"Female\"").unwrap();
        assert_eq!(parsed, Gender::Female);
    }
}
