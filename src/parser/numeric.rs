//! Lenient numeric parsing for status table cells
//!
//! Cells carry a unit suffix after the value ("549000000 Hz", "5.2 dBmV").
//! Only the token before the first space is parsed; anything unparsable
//! becomes zero.

use std::str::FromStr;

fn leading_token(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed.split(' ').next().unwrap_or_default()
}

fn parse_prefix_or_default<T: FromStr + Default>(value: &str) -> T {
    leading_token(value).parse().unwrap_or_default()
}

/// Parse the integer prefix of a cell, `0` on failure
pub fn parse_int_prefix(value: &str) -> u64 {
    parse_prefix_or_default(value)
}

/// Parse the floating point prefix of a cell, `0.0` on failure
pub fn parse_float_prefix(value: &str) -> f64 {
    parse_prefix_or_default(value)
}
