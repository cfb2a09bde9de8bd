//! Lenient decoders for values the backend may send as `null` or in
//! more than one textual shape.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parses a zone-less date-time, a bare date (read as midnight) or an
/// RFC 3339 timestamp (read in its own offset). Blank input is `None`.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    value
        .parse::<DateTime<FixedOffset>>()
        .ok()
        .map(|stamp| stamp.naive_local())
}

pub fn optional_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_datetime(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time: {raw}")))
}

pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Progress percentage, clamped into 0..=100.
pub fn progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw.clamp(0, 100) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .unwrap()
    }

    #[test]
    fn accepts_backend_and_form_shapes() {
        assert_eq!(parse_datetime("2025-06-05T10:15:00"), Some(at(2025, 6, 5, 10, 15)));
        assert_eq!(parse_datetime("2025-06-05T10:15"), Some(at(2025, 6, 5, 10, 15)));
        assert_eq!(parse_datetime("2025-06-05"), Some(at(2025, 6, 5, 0, 0)));
        assert_eq!(parse_datetime("2025-06-05T10:15:00+02:00"), Some(at(2025, 6, 5, 10, 15)));
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert_eq!(parse_datetime("   "), None);
        assert_eq!(parse_datetime("next tuesday"), None);
    }

    #[test]
    fn negative_progress_clamps_to_zero() {
        #[derive(Deserialize)]
        struct Progress {
            #[serde(deserialize_with = "progress")]
            value: u8,
        }
        let parsed: Progress = serde_json::from_str(r#"{"value": -5}"#).unwrap();
        assert_eq!(parsed.value, 0);
    }
}
