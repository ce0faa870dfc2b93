//! Display formatting for KPI tiles.

/// Insert `,` every three digits of an unsigned digit string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

/// Format `value` with `decimals` places and grouped thousands.
///
/// Values that round to zero never carry a minus sign.
fn format_grouped(value: f64, decimals: usize, prefix: &str) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };
    let negative = value < 0.0 && text.bytes().any(|b| matches!(b, b'1'..=b'9'));

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(prefix);
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `1234.5` with `$` → `$1,234.50`.
#[must_use]
pub fn format_currency(value: f64, symbol: &str) -> String {
    format_grouped(value, 2, symbol)
}

/// Count with grouped thousands: `1234.0` → `1,234`, `2.5` → `2.5`.
///
/// Fractional sums keep their shortest decimal form instead of rounding.
#[must_use]
pub fn format_count(value: f64) -> String {
    let decimals = if value.fract() == 0.0 {
        0
    } else {
        value
            .abs()
            .to_string()
            .split_once('.')
            .map_or(0, |(_, frac)| frac.len())
    };
    format_grouped(value, decimals, "")
}

/// Two-decimal rating: `6.9727` → `6.97`.
#[must_use]
pub fn format_rating(value: f64) -> String {
    format_grouped(value, 2, "")
}
