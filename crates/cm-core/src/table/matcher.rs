//! Column-typed value matching.
//!
//! `matches` is total: null values and unparseable dates simply fail to
//! match. The query is expected to be trimmed and lowercased already;
//! `filter_records` handles that once per pass.

use super::{format_number, ColumnType, Value};
use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};

/// Does `value`, interpreted per `ty`, match the query?
pub fn matches(value: &Value, ty: ColumnType, query: &str) -> bool {
    let raw = match value.as_display() {
        Some(s) => s,
        None => return false,
    };

    match ty {
        ColumnType::Text => raw.to_lowercase().contains(query),
        ColumnType::Number => matches_number(value, &raw, query),
        ColumnType::Date => matches_date(value, &raw, query),
    }
}

/// Numeric matching tolerates formatted values like `"₱ 5,000.00"` by
/// stripping everything but digits, `.` and `-` before comparing.
fn matches_number(value: &Value, raw: &str, query: &str) -> bool {
    if query.parse::<f64>().is_ok() {
        let numeric = match value {
            Value::Number(n) => Some(*n),
            _ => {
                let cleaned: String = raw
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                    .collect();
                cleaned.parse::<f64>().ok()
            }
        };
        match numeric {
            Some(n) => format_number(n).contains(query),
            None => false,
        }
    } else {
        raw.to_lowercase().contains(query)
    }
}

fn matches_date(value: &Value, raw: &str, query: &str) -> bool {
    let dt = match parse_datetime(value, raw) {
        Some(dt) => dt,
        None => return false,
    };

    date_haystack(&dt).iter().any(|part| part.contains(query))
}

/// Parse a field as a timestamp: RFC 3339, then bare `YYYY-MM-DD`, then
/// epoch milliseconds.
fn parse_datetime(value: &Value, raw: &str) -> Option<DateTime<Utc>> {
    if let Value::Number(ms) = value {
        return Utc.timestamp_millis_opt(*ms as i64).single();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|ndt| Utc.from_utc_datetime(&ndt));
    }

    if let Ok(ms) = raw.parse::<i64>() {
        return Utc.timestamp_millis_opt(ms).single();
    }

    None
}

/// Every textual form a user might type to mean this timestamp.
fn date_haystack(dt: &DateTime<Utc>) -> Vec<String> {
    let (is_pm, hour12) = dt.hour12();
    let meridiem = if is_pm { "pm" } else { "am" };

    vec![
        // 2024-06-01T10:30:00.000Z
        dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        // 2024-06-01
        dt.format("%Y-%m-%d").to_string(),
        // 2024-06
        dt.format("%Y-%m").to_string(),
        // sat jun 01 2024
        dt.format("%a %b %d %Y").to_string().to_lowercase(),
        // 6/1/2024
        format!(
            "{}/{}/{}",
            dt.format("%-m"),
            dt.format("%-d"),
            dt.format("%Y")
        ),
        // 10:30:00 am
        format!(
            "{}:{:02}:{:02} {}",
            hour12,
            dt.minute(),
            dt.second(),
            meridiem
        ),
        dt.format("%Y").to_string(),
        dt.format("%m").to_string(),
        dt.timestamp_millis().to_string(),
        dt.timestamp().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_null_never_matches() {
        assert!(!matches(&Value::Null, ColumnType::Text, "a"));
        assert!(!matches(&Value::Null, ColumnType::Number, "1"));
        assert!(!matches(&Value::Null, ColumnType::Date, "2024"));
    }

    #[test]
    fn test_text_substring_case_insensitive() {
        let v = Value::from("Maria Santos");
        assert!(matches(&v, ColumnType::Text, "maria"));
        assert!(matches(&v, ColumnType::Text, "san"));
        assert!(!matches(&v, ColumnType::Text, "jose"));
    }

    #[test]
    fn test_number_matches_formatted_value() {
        let v = Value::from("₱ 5,000.00");
        assert!(matches(&v, ColumnType::Number, "5000"));
        assert!(matches(&v, ColumnType::Number, "500"));
        assert!(!matches(&v, ColumnType::Number, "6000"));
    }

    #[test]
    fn test_number_non_numeric_query_falls_back_to_text() {
        let v = Value::from("₱ 5,000.00");
        assert!(matches(&v, ColumnType::Number, "₱"));
        assert!(!matches(&v, ColumnType::Number, "usd"));
    }

    #[test]
    fn test_number_value_variant() {
        let v = Value::Number(5000.0);
        assert!(matches(&v, ColumnType::Number, "5000"));
        assert!(!matches(&v, ColumnType::Number, "5001"));
    }

    #[test]
    fn test_date_forms() {
        let v = date("2024-06-01");
        assert!(matches(&v, ColumnType::Date, "2024"));
        assert!(matches(&v, ColumnType::Date, "06"));
        assert!(matches(&v, ColumnType::Date, "2024-06"));
        assert!(matches(&v, ColumnType::Date, "6/1/2024"));
        assert!(matches(&v, ColumnType::Date, "jun"));
        assert!(!matches(&v, ColumnType::Date, "2025"));
    }

    #[test]
    fn test_date_rfc3339_with_time() {
        let v = date("2024-06-01T10:30:00Z");
        assert!(matches(&v, ColumnType::Date, "10:30"));
        assert!(matches(&v, ColumnType::Date, "am"));
        assert!(matches(&v, ColumnType::Date, "2024-06-01"));
    }

    #[test]
    fn test_date_epoch_millis() {
        // 2024-06-01T00:00:00Z
        let v = Value::Number(1_717_200_000_000.0);
        assert!(matches(&v, ColumnType::Date, "2024-06-01"));
        assert!(matches(&v, ColumnType::Date, "1717200000"));
    }

    #[test]
    fn test_date_unparseable_fails_closed() {
        assert!(!matches(&date("not a date"), ColumnType::Date, "2024"));
        assert!(!matches(&date(""), ColumnType::Date, "2024"));
    }
}
