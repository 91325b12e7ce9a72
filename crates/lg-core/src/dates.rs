//! Human-readable dates for preview panels.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde_json::Value;

const DATE_KEYWORDS: [&str; 7] = [
    "date",
    "day",
    "departure",
    "arrival",
    "check_in",
    "check_out",
    "return",
];

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$").expect("valid regex"));

/// Format `YYYY-MM-DD` (or `/`-separated) as `"Jan 1st, 2025"`.
///
/// Anything that is not a real calendar date is returned unchanged.
pub fn format_date(value: &str) -> String {
    parse_date(value)
        .map(|date| {
            format!(
                "{} {}{}, {}",
                date.format("%b"),
                date.day(),
                ordinal_suffix(date.day()),
                date.year()
            )
        })
        .unwrap_or_else(|| value.to_string())
}

/// Format `value` as a date when `key` names a date-like field.
///
/// Non-string values are stringified as-is.
pub fn format_value_if_date(key: &str, value: &Value) -> String {
    let Some(text) = value.as_str() else {
        return value_to_string(value);
    };
    if is_date_key(key) && DATE_PATTERN.is_match(text) {
        format_date(text)
    } else {
        text.to_string()
    }
}

pub fn is_date_key(key: &str) -> bool {
    let key = key.to_lowercase();
    DATE_KEYWORDS.iter().any(|keyword| key.contains(keyword))
}

/// Plain rendering of a JSON value: strings without quotes, the rest as JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let caps = DATE_PATTERN.captures(value.trim())?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn ordinal_suffix(day: u32) -> &'static str {
    if (4..=20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_dates_with_ordinals() {
        assert_eq!(format_date("2025-01-01"), "Jan 1st, 2025");
        assert_eq!(format_date("2025-12-25"), "Dec 25th, 2025");
        assert_eq!(format_date("2025-03-02"), "Mar 2nd, 2025");
        assert_eq!(format_date("2025-05-23"), "May 23rd, 2025");
        assert_eq!(format_date("2025-07-11"), "Jul 11th, 2025");
        assert_eq!(format_date("2025-07-12"), "Jul 12th, 2025");
        assert_eq!(format_date("2025-07-13"), "Jul 13th, 2025");
        assert_eq!(format_date("2025-08-31"), "Aug 31st, 2025");
        assert_eq!(format_date("2025/6/9"), "Jun 9th, 2025");
    }

    #[test]
    fn invalid_dates_are_unchanged() {
        assert_eq!(format_date("2025-02-30"), "2025-02-30");
        assert_eq!(format_date("next Tuesday"), "next Tuesday");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn date_keys_are_formatted() {
        assert_eq!(
            format_value_if_date("check_in", &json!("2025-01-01")),
            "Jan 1st, 2025"
        );
        assert_eq!(
            format_value_if_date("Departure_Date", &json!("2025-06-12")),
            "Jun 12th, 2025"
        );
        assert_eq!(
            format_value_if_date("return", &json!("2025-06-20")),
            "Jun 20th, 2025"
        );
    }

    #[test]
    fn other_keys_are_unchanged() {
        assert_eq!(format_value_if_date("name", &json!("2025-01-01")), "2025-01-01");
    }

    #[test]
    fn date_key_with_non_date_value() {
        assert_eq!(format_value_if_date("day", &json!("Monday")), "Monday");
        assert_eq!(
            format_value_if_date("departure_time", &json!("2025-01-01T10:00")),
            "2025-01-01T10:00"
        );
    }

    #[test]
    fn non_string_values_are_stringified() {
        assert_eq!(format_value_if_date("days", &json!(5)), "5");
        assert_eq!(format_value_if_date("price", &json!(12.5)), "12.5");
        assert_eq!(format_value_if_date("direct", &json!(true)), "true");
        assert_eq!(format_value_if_date("stops", &json!(null)), "null");
    }
}
