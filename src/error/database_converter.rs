use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
///
/// Constraint violations become `Duplicate` or `Validation`; everything else
/// becomes `Database` with the driver's message attached.
pub struct DatabaseErrorConverter;

type ErrorInfo = Box<dyn DatabaseErrorInformation + Send + Sync>;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info, operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(kind: DatabaseErrorKind, info: ErrorInfo, operation: &str) -> AppError {
        let message = info.message();
        let constraint_name = info.constraint_name();

        let converted = match kind {
            DatabaseErrorKind::UniqueViolation => {
                let duplicate =
                    ConstraintParser::parse_unique_violation(message, info.details(), constraint_name)
                        .map(|(entity, field, value)| AppError::Duplicate { entity, field, value })
                        .unwrap_or_else(|| Self::unparsed_duplicate(constraint_name));
                Some(duplicate)
            }
            DatabaseErrorKind::NotNullViolation => ConstraintParser::parse_not_null_violation(message)
                .map(|(entity, field)| AppError::Validation {
                    field,
                    reason: format!("Field is required for {}", entity),
                }),
            DatabaseErrorKind::CheckViolation => {
                ConstraintParser::parse_check_violation(message, constraint_name).map(
                    |(entity, field)| AppError::Validation {
                        field,
                        reason: format!("Check constraint failed for {} field", entity),
                    },
                )
            }
            _ => None,
        };

        converted.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(message.to_string()),
        })
    }

    /// A unique violation is always a conflict, even when the driver message
    /// cannot be broken down into table, column and value.
    fn unparsed_duplicate(constraint_name: Option<&str>) -> AppError {
        let (entity, field) = constraint_name
            .and_then(ConstraintParser::parse_constraint_name)
            .unwrap_or_else(|| {
                (
                    "unknown".to_string(),
                    constraint_name.unwrap_or("unknown").to_string(),
                )
            });
        AppError::Duplicate {
            entity,
            field,
            value: "unknown".to_string(),
        }
    }
}
