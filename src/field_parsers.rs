//! Field parsing utilities for imported and user-entered numbers.
//!
//! Numbers are parsed leniently: surrounding whitespace is ignored and the
//! longest leading decimal prefix is used, so `"12abc"` reads as 12. Input with
//! no numeric prefix, or a non-finite value, has no number at all.

use log::debug;

/// Parses the leading decimal number of `input`.
///
/// Accepts an optional sign, digits with an optional fractional part, and an
/// optional exponent.
///
/// # Arguments
/// * `input` - Text starting with a number (e.g., "12.5", " 12abc" or "1e3")
///
/// # Returns
/// The parsed value, or `None` when no digits are found or the value is not
/// finite.
pub fn parse_leading_number(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    let value = s.get(..end)?.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Parses a numeric CSV column, defaulting to 0.
///
/// # Arguments
/// * `field` - The raw column value, or `None` when the row is too short
///
/// # Returns
/// The parsed number, or 0 for a missing, empty or non-numeric field.
pub fn number_or_zero(field: Option<&str>) -> f64 {
    match field.and_then(parse_leading_number) {
        Some(value) => value,
        None => {
            if let Some(raw) = field.filter(|f| !f.trim().is_empty()) {
                debug!("Non-numeric field '{raw}', using 0");
            }
            0.0
        }
    }
}

/// Parses a filter threshold.
///
/// # Arguments
/// * `input` - The threshold as entered (e.g., "50", "" or "abc")
///
/// # Returns
/// `Some(value)` for numeric input. Empty and non-numeric input both mean
/// "no constraint" and return `None`.
pub fn parse_threshold(input: &str) -> Option<f64> {
    if input.trim().is_empty() {
        return None;
    }
    let parsed = parse_leading_number(input);
    if parsed.is_none() {
        debug!("Ignoring non-numeric threshold '{input}'");
    }
    parsed
}

#[cfg(test)]
#[path = "field_parsers_tests.rs"]
mod tests;
