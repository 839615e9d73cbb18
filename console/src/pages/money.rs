//! Naira amounts. The wire carries integer kobo; people type and read naira.

#[cfg(test)]
#[path = "money_test.rs"]
mod tests;

use crate::net::error::ApiError;

const MINOR_PER_MAJOR: i64 = 100;

/// Parse a typed major-unit amount (`"12.50"`) into minor units (`1250`),
/// rounding to the nearest minor unit.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for empty, non-numeric, non-finite, zero,
/// negative or out-of-range input.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn parse_major_to_minor(raw: &str) -> Result<i64, ApiError> {
    let invalid = || ApiError::Validation("Enter a valid amount".into());

    let major: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !major.is_finite() || major <= 0.0 {
        return Err(invalid());
    }

    let minor = (major * MINOR_PER_MAJOR as f64).round();
    if minor < 1.0 || minor >= i64::MAX as f64 {
        return Err(invalid());
    }
    Ok(minor as i64)
}

/// Render minor units as a major-unit amount with two decimals.
#[must_use]
pub fn format_minor_as_major(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let per = MINOR_PER_MAJOR.unsigned_abs();
    format!("{sign}{}.{:02}", abs / per, abs % per)
}
