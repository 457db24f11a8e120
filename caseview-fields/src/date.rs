use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse the date forms found in case fixtures.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, naive ISO date-times and
/// millisecond epoch numbers.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// `DD/MM/YYYY`, the en-GB short numeric form.
pub fn format_uk(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Format a date value, falling back to the raw text when it does not parse.
pub fn format_or_raw(value: &Value) -> String {
    match parse_date(value) {
        Some(date) => format_uk(date),
        None => crate::text::display_text(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_iso_date() {
        assert_eq!(format_or_raw(&json!("2024-03-05")), "05/03/2024");
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(format_or_raw(&json!("2024-12-01T09:30:00Z")), "01/12/2024");
        assert_eq!(format_or_raw(&json!("2024-12-01T09:30:00")), "01/12/2024");
        assert_eq!(format_or_raw(&json!("2024-12-01T09:30:00.250+01:00")), "01/12/2024");
        assert_eq!(format_or_raw(&json!(0)), "01/01/1970");
    }

    #[test]
    fn test_invalid_passes_through() {
        assert_eq!(format_or_raw(&json!("not-a-date")), "not-a-date");
        assert_eq!(format_or_raw(&json!("2024-13-45")), "2024-13-45");
        assert_eq!(format_or_raw(&json!(true)), "true");
    }
}
