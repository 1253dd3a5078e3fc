//! Human-readable number formatting for table output.
//!
//! Prices and volumes use Indian digit grouping (`12,34,567.891`) with at most
//! three fraction digits; market capitalisation is shown in crores.

use ferroscreen_core::EquityRecord;

const MAX_FRACTION_DIGITS: usize = 3;
const CRORE: f64 = 10_000_000.0;

/// Formats `value` with Indian grouping, dropping trailing fraction zeros.
pub fn grouped(value: f64) -> String {
    if !value.is_finite() {
        return String::from("-");
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let is_zero = integer.chars().all(|ch| ch == '0') && fraction.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if fraction.is_empty() {
        format!("{sign}{}", group_indian(integer))
    } else {
        format!("{sign}{}.{fraction}", group_indian(integer))
    }
}

/// Rupee amount, or `-` when absent.
pub fn rupees(value: Option<f64>) -> String {
    match value {
        Some(value) if value.is_finite() => format!("₹{}", grouped(value)),
        _ => String::from("-"),
    }
}

/// Market capitalisation in crores, or `-` when absent.
pub fn crores(market_cap: Option<f64>) -> String {
    match market_cap {
        Some(value) if value.is_finite() => format!("₹{} Cr", grouped(value / CRORE)),
        _ => String::from("-"),
    }
}

/// Share count with grouping, or `-` when absent.
pub fn count(value: Option<u64>) -> String {
    value.map_or_else(|| String::from("-"), |value| group_indian(&value.to_string()))
}

/// Change label such as `+12.5 (1.2%)`. The sign prefix follows `change`.
pub fn change_label(record: &EquityRecord) -> String {
    let prefix = if record.is_advancing() { "+" } else { "" };
    format!(
        "{prefix}{} ({}%)",
        grouped(record.change),
        record.percent_change
    )
}

/// Arrow marking direction; `change == 0` counts as advancing.
pub fn direction(record: &EquityRecord) -> &'static str {
    if record.is_advancing() {
        "▲"
    } else {
        "▼"
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}
