//! Low-level value parsing for the loosely-typed analysis payload.
//!
//! Every function here is total: unparseable input yields a default or
//! `None`, never an error. See [`crate::normalize`] for how these compose
//! into full signal normalization.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Parses an entry price from a number or a price-like string.
///
/// Strings are stripped to digits, dots, and dashes first. A `-`-separated
/// pair of valid numbers (a quoted range such as `"100-200"`) averages to
/// its midpoint; otherwise the first valid number wins; otherwise `0`.
#[must_use]
pub fn parse_entry_price(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            let parts: Vec<Option<f64>> = cleaned
                .split('-')
                .map(|part| part.trim().parse::<f64>().ok())
                .collect();

            if parts.len() == 2 {
                if let (Some(low), Some(high)) = (parts[0], parts[1]) {
                    return (low + high) / 2.0;
                }
            }
            parts.into_iter().flatten().next().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// Parses a single price-like value (number or numeric string).
#[must_use]
pub fn parse_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Normalizes a raw ticker: leading `#` and trailing `/USDT` stripped,
/// remainder uppercased. `"#BTC/USDT"` becomes `"BTC"`.
#[must_use]
pub fn normalize_asset(symbol: &str) -> String {
    let s = symbol.trim().trim_start_matches('#');
    let s = s
        .strip_suffix("/USDT")
        .or_else(|| s.strip_suffix("/usdt"))
        .unwrap_or(s);
    s.to_uppercase()
}

/// Parses a subscriber count from a number or a numeric string.
#[must_use]
pub fn parse_subscribers(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Parses an accuracy figure from a percentage string (`"85%"`) or number.
#[must_use]
pub fn parse_accuracy(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Combines the worker's separate `date` and `time` fields into a UTC
/// instant. Returns `None` when the pair doesn't match a known format.
#[must_use]
pub fn combine_timestamp(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let raw = format!("{} {}", date.trim(), time.trim());
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
