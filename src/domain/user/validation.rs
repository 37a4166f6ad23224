//! User validation utilities

use thiserror::Error;

use super::query::{SortField, SortOrder, UserSort};

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("All fields are required")]
    MissingFields,

    #[error("name cannot be empty")]
    EmptyName,

    #[error("email cannot be empty")]
    EmptyEmail,

    #[error("Both sortType and sortOrder are required together")]
    UnpairedSort,

    #[error("Invalid sortType: {0}")]
    InvalidSortField(String),

    #[error("Invalid sortOrder: {0}")]
    InvalidSortOrder(String),
}

/// Treat empty or whitespace-only text as absent
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validate the fields of a new user
///
/// Rules:
/// - name, email and password must all be present
/// - none of them may be empty or whitespace-only
pub fn validate_new_user<'a>(
    name: Option<&'a str>,
    email: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<(&'a str, &'a str, &'a str), UserValidationError> {
    match (present(name), present(email), present(password)) {
        (Some(name), Some(email), Some(password)) => Ok((name, email, password)),
        _ => Err(UserValidationError::MissingFields),
    }
}

/// Validate a replacement name. Absent is fine, empty is not.
pub fn validate_name(name: Option<&str>) -> Result<(), UserValidationError> {
    match name {
        Some(name) if name.trim().is_empty() => Err(UserValidationError::EmptyName),
        _ => Ok(()),
    }
}

/// Validate a replacement email. Absent is fine, empty is not.
pub fn validate_email(email: Option<&str>) -> Result<(), UserValidationError> {
    match email {
        Some(email) if email.trim().is_empty() => Err(UserValidationError::EmptyEmail),
        _ => Ok(()),
    }
}

/// Validate the sortType/sortOrder pair of a list request
///
/// Both absent yields `None` (the caller applies the default order).
/// Exactly one present is rejected.
pub fn validate_sort(
    sort_type: Option<&str>,
    sort_order: Option<&str>,
) -> Result<Option<UserSort>, UserValidationError> {
    match (present(sort_type), present(sort_order)) {
        (None, None) => Ok(None),
        (Some(field), Some(order)) => {
            let field: SortField = field.parse()?;
            let order: SortOrder = order.parse()?;
            Ok(Some(UserSort::new(field, order)))
        }
        _ => Err(UserValidationError::UnpairedSort),
    }
}
