use crate::error::AppError;

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Require a non-blank string field.
pub fn validate_required(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Require a non-blank string field if it is present (merge-update payloads).
pub fn validate_required_if_present(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(v) => validate_required(field, v),
        None => Ok(()),
    }
}

/// Validate a star rating (1-5 inclusive).
pub fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation(
            "Rating must be an integer between 1 and 5".into(),
        ));
    }
    Ok(())
}
