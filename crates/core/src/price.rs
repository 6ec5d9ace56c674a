//! Price value object and the text conventions used to show and edit prices.
//!
//! Prices travel through the client as text more often than as numbers: they
//! are read back from rendered labels, typed into inputs and sent as form
//! fields. The helpers here follow the browser's number conventions
//! (`parseFloat`, `Number#toString`, `toFixed(2)`) so that what the user sees
//! and what the server receives stay consistent.

use crate::error::{DomainError, DomainResult};

/// Currency prefix used for every rendered price.
pub const CURRENCY_SYMBOL: char = '£';

/// Label shown (after the currency prefix) when a medicine has no price.
pub const PRICE_NOT_AVAILABLE: &str = "Price not available";

/// Maximum number of fractional digits accepted while typing a price.
pub const MAX_FRACTION_DIGITS: usize = 2;

/// A parsed, numeric price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price(f64);

impl Price {
    /// Parse user input the way a browser `parseFloat` would: the longest
    /// numeric prefix wins, anything without a numeric prefix is rejected.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        parse_float(raw)
            .map(Self)
            .ok_or_else(|| DomainError::validation(format!("`{raw}` is not a valid price")))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Value as sent in form bodies (`12.5`, not `12.50`).
    pub fn to_form_value(self) -> String {
        js_number_string(self.0)
    }

    /// Currency-prefixed label without fixed-point rounding (`£12.5`).
    pub fn display_raw(self) -> String {
        format!("{CURRENCY_SYMBOL}{}", js_number_string(self.0))
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&format_price(Some(self.0)))
    }
}

/// Render an optional price as `£x.yy`, or the "not available" placeholder.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(value) => format!("{CURRENCY_SYMBOL}{}", to_fixed_2(value)),
        None => format!("{CURRENCY_SYMBOL}{PRICE_NOT_AVAILABLE}"),
    }
}

/// `toFixed(2)`: exact ties round away from zero, not to even.
fn to_fixed_2(value: f64) -> String {
    // -0 renders as 0.00, like toFixed.
    let value = if value == 0.0 { 0.0 } else { value };

    // A value sits exactly halfway between two cents iff it is an odd
    // multiple of 1/8; scaling by 8 and by 100 is exact in this range.
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 && eighths.abs() < EXACT_EIGHTHS_LIMIT {
        let cents = (value.abs() * 100.0 + 0.5) as u64;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}{}.{:02}", cents / 100, cents % 100);
    }
    format!("{value:.2}")
}

const EXACT_EIGHTHS_LIMIT: f64 = (1u64 << 50) as f64;

/// Parse the numeric price back out of a rendered price label.
///
/// Labels that carry no number (the placeholder) yield `0`.
pub fn parse_displayed_price(label: &str) -> f64 {
    parse_float(&label.replace(CURRENCY_SYMBOL, "")).unwrap_or(0.0)
}

/// Browser-compatible `parseFloat`: skips leading whitespace and reads the
/// longest prefix forming a decimal literal. Returns `None` where the browser
/// would produce `NaN`.
pub fn parse_float(input: &str) -> Option<f64> {
    let s = input.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Render a number the way `Number#toString` does for the values a price
/// input can hold.
pub fn js_number_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// Truncate (never round) the fractional part of a typed price to
/// [`MAX_FRACTION_DIGITS`] digits.
///
/// Only the segment between the first and second `.` counts as the fraction;
/// when it is too long, anything after it is dropped as well.
pub fn truncate_fraction(input: &str) -> String {
    let Some((whole, rest)) = input.split_once('.') else {
        return input.to_string();
    };
    let fraction = rest.split('.').next().unwrap_or_default();
    if fraction.chars().count() <= MAX_FRACTION_DIGITS {
        return input.to_string();
    }
    let kept: String = fraction.chars().take(MAX_FRACTION_DIGITS).collect();
    format!("{whole}.{kept}")
}
