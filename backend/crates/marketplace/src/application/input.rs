//! Input checks shared by the use cases

use crate::error::{MarketError, MarketResult};

/// Every field must contain something other than whitespace
pub(crate) fn require_filled(fields: &[&str]) -> MarketResult<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(MarketError::MissingFields);
    }
    Ok(())
}

/// Minimum length in characters after trimming
pub(crate) fn require_min_length(
    value: &str,
    field: &'static str,
    min: usize,
) -> MarketResult<String> {
    let value = value.trim();
    if value.chars().count() < min {
        return Err(MarketError::InvalidCourseField { field, min });
    }
    Ok(value.to_string())
}
