//! Numeric readings of sheet cell text.
//!
//! Cells arrive as formatted text. Malformed text reads as `NaN` instead of
//! failing, so a bad cell only ever makes its own comparisons false.

/// Reads the whole trimmed cell as a decimal number.
///
/// Empty text reads as `0`, text that is not a number reads as `NaN`. The
/// only spelled-out value accepted is `Infinity`, optionally signed; forms
/// such as `inf` or `nan` read as `NaN`.
pub fn read_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    if unsigned.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Reads the leading integer of a cell, ignoring whatever follows it.
///
/// Leading whitespace and a single sign are allowed. `"80.7"` reads as `80`,
/// `"12abc"` as `12`, and text without leading digits as `NaN`.
pub fn read_integer_prefix(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return f64::NAN;
    }

    let value = rest[..digits].parse::<f64>().unwrap_or(f64::NAN);
    if negative { -value } else { value }
}

/// Rounds half-way values up, towards positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Renders a score the way it is written back to the sheet.
///
/// Integral values have no fractional part (`66`), others use the shortest
/// decimal form (`66.5`).
pub fn format_score(value: f64) -> String {
    format!("{value}")
}
