//! Lenient value coercion
//!
//! Spreadsheet cells arrive as loosely-typed text or numbers. These helpers
//! read the longest usable prefix the way browser spreadsheet tooling does
//! (`parseInt` / `parseFloat` / `Date` semantics) and never fail loudly:
//! anything unreadable comes back as `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::CellValue;

/// `chrono` format of date literals: no zone, no fractional seconds
pub const DATE_LITERAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Largest absolute timestamp, in milliseconds, a date may carry
const MAX_TIMESTAMP_MILLIS: f64 = 8.64e15;

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("float prefix pattern is valid")
});

static YEAR_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}$").expect("year pattern is valid"));

const ZONED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

fn trim_start_js(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Render a number the way JavaScript's `String(n)` does.
///
/// Exponent notation is used below `1e-6` and from `1e21` up; `-0` renders as `0`.
pub fn js_number_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    format!("{}", n)
}

/// Read a leading integer, returning its literal text.
///
/// Leading whitespace and a sign are allowed, as is a `0x` hex prefix.
/// Reading stops at the first non-digit, so `"12.7"` reads as `12`.
/// Decimal digits are kept exactly rather than rounded through a float.
pub fn parse_int_prefix(text: &str) -> Option<String> {
    let s = trim_start_js(text);
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        let end = hex
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(hex.len());
        if end == 0 {
            return None;
        }
        let value = hex[..end]
            .chars()
            .filter_map(|c| c.to_digit(16))
            .fold(0f64, |acc, d| acc * 16.0 + f64::from(d));
        return Some(js_number_string(if negative { -value } else { value }));
    }

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = rest[..end].trim_start_matches('0');
    if end == 0 {
        return None;
    }
    if digits.is_empty() {
        return Some("0".to_string());
    }
    Some(if negative {
        format!("-{}", digits)
    } else {
        digits.to_string()
    })
}

/// Read a leading decimal number (exponent and `Infinity` allowed)
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = trim_start_js(text);
    let matched = FLOAT_PREFIX.find(s)?;
    matched.as_str().parse::<f64>().ok()
}

fn from_millis(millis: f64) -> Option<NaiveDateTime> {
    if !millis.is_finite() || millis.abs() > MAX_TIMESTAMP_MILLIS {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64).map(|dt| dt.naive_utc())
}

fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.naive_utc());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    if YEAR_ONLY.is_match(text) {
        let year = text.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0);
    }
    None
}

/// Interpret a cell as a point in time.
///
/// Numbers are epoch milliseconds. Text may be RFC 3339, RFC 2822, or a
/// zone-less `YYYY-MM-DD[ HH:MM[:SS]]` / `YYYY/MM/DD` / `MM/DD/YYYY` form,
/// which is taken as UTC. Zoned inputs are converted to UTC.
pub fn parse_date(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::Null => None,
        CellValue::Bool(b) => from_millis(if *b { 1.0 } else { 0.0 }),
        CellValue::Number(n) => from_millis(*n),
        CellValue::Text(s) => parse_date_text(s),
        CellValue::DateTime(dt) => Some(*dt),
    }
}
