//! Reusable field filters
//!
//! These filters normalize raw form values before validation

use rust_decimal::Decimal;
use std::str::FromStr;

/// Filter: trim whitespace, mapping a missing value to `None`
pub fn trim() -> impl Fn(Option<&str>) -> Option<String> + Send + Sync + Clone {
    |value: Option<&str>| value.map(|s| s.trim().to_string())
}

/// Why a raw value did not coerce to a decimal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    /// Not a number at all
    NotANumber,
    /// A well-formed number beyond what a decimal holds
    Overflow { negative: bool },
}

// Digits kept after the decimal point; far below a cent either way.
const MAX_FRACTION_DIGITS: usize = 20;

/// Filter: coerce a raw value into a decimal number
///
/// Follows the usual form-number coercion: surrounding whitespace is
/// ignored and a blank value coerces to zero, so "no amount" surfaces as a
/// non-positive amount rather than a parse failure. Accepted forms are plain
/// decimals (`15.50`, `.5`, `-3`), scientific notation (`1.5e2`) and
/// unsigned `0x`/`0o`/`0b` integers. Anything else is
/// [`NumberError::NotANumber`].
pub fn coerce_decimal()
-> impl Fn(Option<&str>) -> Result<Decimal, NumberError> + Send + Sync + Clone {
    |value: Option<&str>| {
        let raw = value.unwrap_or("").trim();
        if raw.is_empty() {
            return Ok(Decimal::ZERO);
        }
        if let Some(result) = parse_radix(raw) {
            return result;
        }
        match raw.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => parse_scientific(mantissa, exponent),
            None => parse_plain(raw),
        }
    }
}

fn parse_radix(raw: &str) -> Option<Result<Decimal, NumberError>> {
    let radix = match raw.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &raw[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(Err(NumberError::NotANumber));
    }
    Some(
        u64::from_str_radix(digits, radix)
            .map(Decimal::from)
            .map_err(|_| NumberError::Overflow { negative: false }),
    )
}

fn parse_plain(raw: &str) -> Result<Decimal, NumberError> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (int, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (int.is_empty() && fraction.is_empty()) || !is_digits(int) || !is_digits(fraction) {
        return Err(NumberError::NotANumber);
    }

    let int = if int.is_empty() { "0" } else { int };
    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    let normalized = if fraction.is_empty() {
        int.to_string()
    } else {
        format!("{}.{}", int, fraction)
    };

    let value = Decimal::from_str(&normalized).map_err(|_| NumberError::Overflow { negative })?;
    Ok(if negative { -value } else { value })
}

fn parse_scientific(mantissa: &str, exponent: &str) -> Result<Decimal, NumberError> {
    let mut value = parse_plain(mantissa)?;
    let exponent: i64 = exponent.parse().map_err(|_| NumberError::NotANumber)?;
    if value.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let negative = value.is_sign_negative();
    if exponent >= 0 {
        for _ in 0..exponent {
            value = value
                .checked_mul(Decimal::TEN)
                .ok_or(NumberError::Overflow { negative })?;
        }
    } else {
        // Past this many places the value is zero at decimal precision.
        for _ in 0..exponent.unsigned_abs().min(64) {
            value /= Decimal::TEN;
        }
    }
    Ok(value)
}
