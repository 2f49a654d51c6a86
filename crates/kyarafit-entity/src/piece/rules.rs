//! Field rules shared by drafts and patches.
//!
//! Limits mirror what the backend enforces so a payload it would reject
//! fails locally with the same `Validation` kind first.

use validator::ValidationError;

/// Maximum name length.
pub const NAME_MAX: u64 = 255;
/// Maximum description length.
pub const DESCRIPTION_MAX: u64 = 1000;
/// Maximum category length.
pub const CATEGORY_MAX: u64 = 100;

/// Reject names made only of whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Prices must be finite and non-negative.
pub fn price(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        let mut err = ValidationError::new("price");
        err.message = Some("must be a non-negative amount".into());
        return Err(err);
    }
    Ok(())
}

/// Tags must be non-blank.
pub fn tags(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|t| t.trim().is_empty()) {
        let mut err = ValidationError::new("tags");
        err.message = Some("tags must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Parse user-entered price text. Non-numeric input yields `None`.
///
/// Range is not checked here; [`price`] rejects negatives at validation.
pub fn parse_price(text: &str) -> Option<f64> {
    text.trim()
        .trim_start_matches('$')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
