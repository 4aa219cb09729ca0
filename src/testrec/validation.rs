//! Field validation.
//!
//! Every value that ends up in a record's name fields passes through here first.
//! The functions are pure: they trim the input, check it and hand back the value
//! that should be stored.
//!
//! - System names: 3 to 99 characters, letters, digits, spaces and `()[]-_.`
//! - Test types: 3 to 99 characters, letters and digits only
//! - Record ids: a base-10 integer greater than zero, nothing trailing
//! - Results: one of `Failed`, `Passed`, `Pending`, `Success` (any case)

use crate::model::{InvalidResult, TestResult, MAX_FIELD_LEN};
use std::fmt;
use thiserror::Error;

/// Shortest accepted name (and search query), in characters.
pub const MIN_FIELD_LEN: usize = 3;

const SYSTEM_NAME_PUNCTUATION: &[char] = &['(', ')', '[', ']', '-', '_', '.', ' '];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SystemName,
    TestType,
    Query,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::SystemName => "system name",
            Field::TestType => "test type",
            Field::Query => "search query",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: Field },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: Field, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: Field, max: usize },

    #[error("{field} contains invalid character '{ch}'")]
    InvalidCharacter { field: Field, ch: char },

    #[error("'{0}' is not a valid record id (expected a whole number above zero)")]
    InvalidId(String),

    #[error("'{0}' is not one of the listed options")]
    InvalidChoice(String),

    #[error("{0}")]
    InvalidResult(#[from] InvalidResult),
}

/// Validates a system name and returns it trimmed.
///
/// ```
/// use testrec::validation::validate_system_name;
///
/// assert_eq!(validate_system_name("  API Gateway (v2) ").unwrap(), "API Gateway (v2)");
/// assert!(validate_system_name("AB").is_err());
/// assert!(validate_system_name("db;drop").is_err());
/// ```
pub fn validate_system_name(input: &str) -> Result<String, ValidationError> {
    validate_name(input, Field::SystemName, |ch| {
        ch.is_ascii_alphanumeric() || SYSTEM_NAME_PUNCTUATION.contains(&ch)
    })
}

/// Validates a test type and returns it trimmed. Letters and digits only.
pub fn validate_test_type(input: &str) -> Result<String, ValidationError> {
    validate_name(input, Field::TestType, |ch| ch.is_ascii_alphanumeric())
}

fn validate_name(
    input: &str,
    field: Field,
    allowed: impl Fn(char) -> bool,
) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    let len = trimmed.chars().count();
    if len < MIN_FIELD_LEN {
        return Err(ValidationError::TooShort {
            field,
            min: MIN_FIELD_LEN,
        });
    }
    if len > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_FIELD_LEN,
        });
    }

    if let Some(ch) = trimmed.chars().find(|&ch| !allowed(ch)) {
        return Err(ValidationError::InvalidCharacter { field, ch });
    }

    Ok(trimmed.to_string())
}

/// Parses a record id typed by the user.
pub fn validate_record_id(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    match trimmed.parse::<i64>() {
        Ok(n) if n > 0 => u32::try_from(n).map_err(|_| ValidationError::InvalidId(trimmed.into())),
        _ => Err(ValidationError::InvalidId(trimmed.to_string())),
    }
}

/// Parses a result token. Unknown text is an error here; only the codec
/// degrades it to `Pending`.
pub fn validate_result(input: &str) -> Result<TestResult, ValidationError> {
    Ok(input.parse::<TestResult>()?)
}

/// Search queries need at least [`MIN_FIELD_LEN`] characters.
pub fn validate_query(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty {
            field: Field::Query,
        });
    }
    if trimmed.chars().count() < MIN_FIELD_LEN {
        return Err(ValidationError::TooShort {
            field: Field::Query,
            min: MIN_FIELD_LEN,
        });
    }
    Ok(trimmed.to_string())
}
