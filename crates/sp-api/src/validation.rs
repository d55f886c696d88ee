use crate::error::ApiError;

/// Goal priorities accepted by the API.
const VALID_PRIORITIES: &[&str] = &["low", "medium", "high"];

/// Validate a goal priority label.
pub fn validate_priority(priority: &str) -> Result<(), ApiError> {
    let normalized = priority.to_lowercase();
    if !VALID_PRIORITIES.contains(&normalized.as_str()) {
        return Err(ApiError::Validation(format!(
            "Invalid priority: '{priority}'. Must be one of 'low', 'medium', 'high'",
        )));
    }
    Ok(())
}

/// Validate a rating field (confidence, focus, effectiveness), 1-5.
pub fn validate_rating(name: &str, rating: i32) -> Result<(), ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::Validation(format!(
            "Invalid {name} rating: {rating}. Must be between 1 and 5",
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_priority() {
        assert!(validate_priority("low").is_ok());
        assert!(validate_priority("HIGH").is_ok()); // Case insensitive
        assert!(validate_priority("urgent").is_err());
        assert!(validate_priority("").is_err());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating("focus", 1).is_ok());
        assert!(validate_rating("focus", 5).is_ok());
        assert!(validate_rating("focus", 0).is_err());
        assert!(validate_rating("focus", 6).is_err());
    }
}
