//! FILENAME: core/dataset/src/date.rs
//! PURPOSE: Reduces heterogeneous date values to the canonical `YYYY-MM-DD` key.
//! CONTEXT: Exports carry ISO timestamps, bare dates and the odd number. All of
//! them become a 10-character key used for grouping and axis alignment. The
//! calendar is never validated: a malformed input yields a malformed key, which
//! simply fails to match anything downstream.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use serde_json::Value;

/// Length of a canonical date key.
pub const CANONICAL_DATE_LEN: usize = 10;

/// Anything that can be reduced to a canonical date key.
pub trait CanonicalDate {
    /// Returns the canonical key, or `None` for null/empty input.
    fn canonical_date(&self) -> Option<String>;
}

/// Normalizes a date-like value to `YYYY-MM-DD`.
pub fn normalize_date<T: CanonicalDate + ?Sized>(value: &T) -> Option<String> {
    value.canonical_date()
}

impl CanonicalDate for str {
    fn canonical_date(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(truncate_chars(self, CANONICAL_DATE_LEN))
    }
}

impl CanonicalDate for String {
    fn canonical_date(&self) -> Option<String> {
        self.as_str().canonical_date()
    }
}

impl CanonicalDate for NaiveDate {
    fn canonical_date(&self) -> Option<String> {
        Some(format_calendar_date(self))
    }
}

/// Timestamps use the local calendar fields, not the timestamp's own offset.
impl<Tz: TimeZone> CanonicalDate for DateTime<Tz> {
    fn canonical_date(&self) -> Option<String> {
        Some(format_calendar_date(&self.with_timezone(&Local).date_naive()))
    }
}

impl<T: CanonicalDate> CanonicalDate for Option<T> {
    fn canonical_date(&self) -> Option<String> {
        self.as_ref().and_then(CanonicalDate::canonical_date)
    }
}

impl CanonicalDate for Value {
    fn canonical_date(&self) -> Option<String> {
        match self {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) => s.as_str().canonical_date(),
            Value::Number(n) => {
                if n.as_f64() == Some(0.0) {
                    None
                } else {
                    Some(truncate_chars(&n.to_string(), CANONICAL_DATE_LEN))
                }
            }
            // true, arrays, objects: stringify and cut
            other => Some(truncate_chars(&other.to_string(), CANONICAL_DATE_LEN)),
        }
    }
}

fn format_calendar_date<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Truncates on character boundaries, never inside a UTF-8 sequence.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use serde_json::json;

    #[test]
    fn test_iso_timestamp_is_cut_to_date() {
        assert_eq!(normalize_date("2024-05-01T10:00:00Z"), Some("2024-05-01".to_string()));
        assert_eq!(normalize_date("2024-05-01"), Some("2024-05-01".to_string()));
    }

    #[test]
    fn test_short_and_malformed_strings_pass_through() {
        assert_eq!(normalize_date("2024-5-1"), Some("2024-5-1".to_string()));
        assert_eq!(normalize_date("not a date at all"), Some("not a date".to_string()));
    }

    #[test]
    fn test_empty_inputs_are_none() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date(&Value::Null), None);
        assert_eq!(normalize_date(&json!(false)), None);
        assert_eq!(normalize_date(&json!(0)), None);
        assert_eq!(normalize_date(&None::<String>), None);
    }

    #[test]
    fn test_calendar_dates_are_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(normalize_date(&date), Some("2024-03-07".to_string()));
    }

    #[test]
    fn test_local_timestamp_uses_local_fields() {
        let ts = Local.with_ymd_and_hms(2024, 12, 31, 23, 30, 0).unwrap();
        assert_eq!(normalize_date(&ts), Some("2024-12-31".to_string()));
    }

    #[test]
    fn test_offset_timestamp_is_converted_to_local_calendar() {
        // 23:30 at +05:00 is 18:30 UTC; the key follows the local day, not the offset's.
        let ts = FixedOffset::east_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 23, 30, 0)
            .unwrap();
        let expected = ts.with_timezone(&Local).date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(normalize_date(&ts), Some(expected));

        let utc = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        let expected = utc.with_timezone(&Local).date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(normalize_date(&utc), Some(expected));
    }

    #[test]
    fn test_other_json_values_are_stringified() {
        assert_eq!(normalize_date(&json!(20240501)), Some("20240501".to_string()));
        assert_eq!(normalize_date(&json!(12345678901234_i64)), Some("1234567890".to_string()));
        assert_eq!(normalize_date(&json!(true)), Some("true".to_string()));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        assert_eq!(normalize_date("дата-2024-05-01"), Some("дата-2024-".to_string()));
    }
}
