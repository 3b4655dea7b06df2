use std::sync::OnceLock;

use regex::Regex;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// PostgreSQL reports the offending key in the error detail
/// (`Key (registration_no)=(REG-1) already exists.`) and the constraint name
/// separately, so both are consulted.
pub struct ConstraintParser;

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").unwrap(),
            column_name: Regex::new(r#"column "([^"]+)""#).unwrap(),
            table_name: Regex::new(r#"(?:table|relation) "([^"]+)""#).unwrap(),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

/// Suffixes PostgreSQL appends to generated constraint names.
const CONSTRAINT_SUFFIXES: [&str; 5] = ["_key", "_pkey", "_idx", "_check", "_fkey"];

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique violation into `(entity, field, value)`.
    ///
    /// `detail` is the `DETAIL:` line, which PostgreSQL reports separately from
    /// the primary message. The field and value come from the `Key (..)=(..)`
    /// pair; the entity comes from the constraint name with the field and
    /// suffix stripped off, so `students_registration_no_key` yields
    /// `students` for the field `registration_no`.
    pub fn parse_unique_violation(
        message: &str,
        detail: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = detail
            .and_then(Self::extract_key_value_from_message)
            .or_else(|| Self::extract_key_value_from_message(message));

        match (key_value, constraint_name) {
            (Some((field, value)), Some(constraint)) => {
                let entity = Self::entity_from_constraint(constraint, &field)
                    .or_else(|| Self::extract_table_from_message(message))
                    .unwrap_or_else(|| "resource".to_string());
                Some((entity, field, value))
            }
            (Some((field, value)), None) => {
                let entity = Self::extract_table_from_message(message)
                    .unwrap_or_else(|| "resource".to_string());
                Some((entity, field, value))
            }
            (None, Some(constraint)) => {
                let (entity, field) = Self::parse_constraint_name(constraint)?;
                Some((entity, field, "duplicate_value".to_string()))
            }
            (None, None) => None,
        }
    }

    /// Parses a not null violation into `(entity, field)`.
    pub fn parse_not_null_violation(message: &str) -> Option<(String, String)> {
        let field = Self::extract_column_from_message(message)?;
        let entity =
            Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Parses a check violation into `(entity, field)` from its constraint name.
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(parsed) = constraint_name.and_then(Self::parse_constraint_name) {
            return Some(parsed);
        }
        Self::parse_not_null_violation(message)
    }

    /// Splits a generated constraint name such as `students_admission_date_check`
    /// into its table and column parts, assuming a single-word table name.
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stem = Self::strip_constraint_suffix(constraint_name)?;
        let (entity, field) = stem.split_once('_')?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }

    fn entity_from_constraint(constraint_name: &str, field: &str) -> Option<String> {
        let stem = Self::strip_constraint_suffix(constraint_name)?;
        // Composite keys are reported as "a, b" but named "table_a_b_key".
        let field_part = field.replace(", ", "_");
        stem.strip_suffix(&field_part)
            .and_then(|s| s.strip_suffix('_'))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn strip_constraint_suffix(constraint_name: &str) -> Option<&str> {
        CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))
    }

    /// Extracts the column from a `column "name"` fragment.
    pub fn extract_column_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extracts the table from a `table "name"` or `relation "name"` fragment.
    pub fn extract_table_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .table_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extracts the `(field, value)` pair from a `Key (field)=(value)` fragment.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        Self::patterns().key_value.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIQUE_MESSAGE: &str =
        "duplicate key value violates unique constraint \"students_registration_no_key\"";
    const UNIQUE_DETAIL: &str = "Key (registration_no)=(REG-1001) already exists.";

    #[test]
    fn test_parse_unique_violation_from_detail_and_constraint() {
        let result = ConstraintParser::parse_unique_violation(
            UNIQUE_MESSAGE,
            Some(UNIQUE_DETAIL),
            Some("students_registration_no_key"),
        );
        assert_eq!(
            result,
            Some((
                "students".to_string(),
                "registration_no".to_string(),
                "REG-1001".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_unique_violation_detail_inlined_in_message() {
        let message = format!("{UNIQUE_MESSAGE}\nDETAIL: {UNIQUE_DETAIL}");
        let result = ConstraintParser::parse_unique_violation(&message, None, None);
        assert_eq!(
            result,
            Some((
                "resource".to_string(),
                "registration_no".to_string(),
                "REG-1001".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_unique_violation_constraint_only() {
        let result = ConstraintParser::parse_unique_violation(
            UNIQUE_MESSAGE,
            None,
            Some("students_registration_no_key"),
        );
        assert_eq!(
            result,
            Some((
                "students".to_string(),
                "registration_no".to_string(),
                "duplicate_value".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_not_null_violation_with_relation() {
        let message =
            "null value in column \"student_name\" of relation \"students\" violates not-null constraint";
        assert_eq!(
            ConstraintParser::parse_not_null_violation(message),
            Some(("students".to_string(), "student_name".to_string()))
        );
    }

    #[test]
    fn test_parse_check_violation() {
        let message = "new row for relation \"students\" violates check constraint \"students_gender_check\"";
        assert_eq!(
            ConstraintParser::parse_check_violation(message, Some("students_gender_check")),
            Some(("students".to_string(), "gender".to_string()))
        );
    }

    #[test]
    fn test_parse_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("students_registration_no_key"),
            Some(("students".to_string(), "registration_no".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("students_pkey"), None);
        assert_eq!(ConstraintParser::parse_constraint_name("invalid"), None);
    }

    #[test]
    fn test_extract_key_value_with_empty_value() {
        assert_eq!(
            ConstraintParser::extract_key_value_from_message("Key (registration_no)=() already exists."),
            Some(("registration_no".to_string(), String::new()))
        );
    }

    #[test]
    fn test_graceful_parsing_failures() {
        let message = "completely unrelated error message";
        assert_eq!(ConstraintParser::parse_unique_violation(message, None, None), None);
        assert_eq!(ConstraintParser::parse_not_null_violation(message), None);
        assert_eq!(ConstraintParser::parse_check_violation(message, None), None);
    }
}
