use std::sync::OnceLock;

use regex::Regex;

use crate::error::ApiError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
pub const MIN_ACTIVITY_LEVEL: f64 = 1.2;
pub const MAX_ACTIVITY_LEVEL: f64 = 1.9;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Trimmed, lowercased email, or `None` when it does not look like an address.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    email_regex().is_match(&email).then_some(email)
}

/// Unwrap a required field, reporting `message` when it is missing or blank.
pub fn required<T>(value: Option<T>, message: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::validation(message))
}

pub fn required_text(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(ApiError::validation(message)),
    }
}

pub fn validate_rating(rating: Option<i32>) -> Result<(), ApiError> {
    match rating {
        Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => Err(ApiError::validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        ))),
        _ => Ok(()),
    }
}

pub fn validate_activity_level(level: f64) -> Result<(), ApiError> {
    if level.is_finite() && (MIN_ACTIVITY_LEVEL..=MAX_ACTIVITY_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Activity level must be between {MIN_ACTIVITY_LEVEL} and {MAX_ACTIVITY_LEVEL}"
        )))
    }
}

pub fn validate_positive(value: Option<f64>, field: &str) -> Result<(), ApiError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => {
            Err(ApiError::validation(format!("{field} must be greater than 0")))
        }
        _ => Ok(()),
    }
}

pub fn validate_non_negative(value: Option<f64>, field: &str) -> Result<(), ApiError> {
    match value {
        Some(v) if !(v.is_finite() && v >= 0.0) => {
            Err(ApiError::validation(format!("{field} cannot be negative")))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalization() {
        assert_eq!(
            normalize_email(" Runner@Example.com ").as_deref(),
            Some("runner@example.com")
        );
        assert!(normalize_email("runner@example").is_none());
        assert!(normalize_email("two words@example.com").is_none());
        assert!(normalize_email("").is_none());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(None).is_ok());
        assert!(validate_rating(Some(1)).is_ok());
        assert!(validate_rating(Some(5)).is_ok());
        assert!(validate_rating(Some(0)).is_err());
        assert!(validate_rating(Some(6)).is_err());
    }

    #[test]
    fn test_activity_level_bounds() {
        assert!(validate_activity_level(1.2).is_ok());
        assert!(validate_activity_level(1.9).is_ok());
        assert!(validate_activity_level(1.1).is_err());
        assert!(validate_activity_level(2.0).is_err());
        assert!(validate_activity_level(f64::NAN).is_err());
    }

    #[test]
    fn test_required_text_rejects_blank() {
        assert!(required_text(Some("   ".into()), "missing").is_err());
        assert_eq!(required_text(Some(" Legs ".into()), "missing").unwrap(), "Legs");
    }

    #[test]
    fn test_numeric_guards() {
        assert!(validate_positive(Some(0.0), "Weight").is_err());
        assert!(validate_positive(Some(70.0), "Weight").is_ok());
        assert!(validate_non_negative(Some(0.0), "Water intake").is_ok());
        assert!(validate_non_negative(Some(-1.0), "Water intake").is_err());
    }
}
