//! Reusable field validators
//!
//! Each validator carries the user-facing message it reports on failure.

use rust_decimal::Decimal;

/// Validator: field is present and not blank
pub fn required(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<(), String> + Send + Sync + Clone {
    move |value: Option<&str>| match value {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(message.to_string()),
    }
}

/// Validator: number must be strictly positive
pub fn positive(message: &'static str) -> impl Fn(&Decimal) -> Result<(), String> + Send + Sync + Clone {
    move |value: &Decimal| {
        if *value > Decimal::ZERO {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }
}

/// Validator: value must be in allowed list
///
/// A missing value is rejected as well.
pub fn in_list(
    allowed: &'static [&'static str],
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<(), String> + Send + Sync + Clone {
    move |value: Option<&str>| match value {
        Some(s) if allowed.contains(&s) => Ok(()),
        _ => Err(message.to_string()),
    }
}
