//! Forgiving `deserialize_with` helpers for section fields.
//!
//! Form input is well-typed, but model output is not: dates arrive as `"2021"`,
//! `"March 2020"` or `"Present"`, numbers arrive as strings, and required strings
//! arrive as `null`. These helpers accept all of those shapes so that a single bad
//! field never sinks an otherwise usable section.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Words a model uses instead of an end date for an ongoing item.
const OPEN_ENDED: &[&str] = &["present", "current", "now", "ongoing", "today"];

/// Parses a date in any of the formats a resume plausibly contains.
///
/// Accepted: `YYYY-MM-DD`, RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM`, `YYYY/MM`, `YYYY`, `Month YYYY`, `Mon YYYY`.
/// Returns `None` for blanks, open-ended words, and anything unrecognised.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() || OPEN_ENDED.contains(&s.to_lowercase().as_str()) {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    // Timestamps with trailing junk ("2020-01-01T00:00:00Z[UTC]"): keep the date part.
    if s.len() > 10 && s.as_bytes().get(10) == Some(&b'T') {
        if let Ok(d) = NaiveDate::parse_from_str(&s[..10], "%Y-%m-%d") {
            return Some(d);
        }
    }

    for sep in ['-', '/'] {
        let mut parts = s.splitn(2, sep);
        if let (Some(y), Some(m)) = (parts.next(), parts.next()) {
            if let (Ok(y), Ok(m)) = (y.parse::<i32>(), m.parse::<u32>()) {
                if y > 999 {
                    return NaiveDate::from_ymd_opt(y, m, 1);
                }
            }
        }
    }

    if s.len() == 4 {
        if let Ok(y) = s.parse::<i32>() {
            return NaiveDate::from_ymd_opt(y, 1, 1);
        }
    }

    for fmt in ["%d %B %Y", "%d %b %Y", "%B %d, %Y", "%b %d, %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // chrono cannot parse a date without a day; pin month-year forms to the 1st.
    for fmt in ["%d %B %Y", "%d %b %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("1 {s}"), fmt) {
            return Some(d);
        }
    }

    None
}

/// `Option<NaiveDate>` from a string, a bare year number, or null.
pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => parse_date(&s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|y| i32::try_from(y).ok())
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)),
        _ => None,
    })
}

/// `String` that tolerates null (empty) and scalar values (stringified).
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_from_value(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// `Option<String>` that tolerates scalar values and maps blanks to `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_from_value(Value::deserialize(deserializer)?).filter(|s| !s.trim().is_empty()))
}

/// `Option<f64>` from a number or a numeric string.
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// `Option<u8>` from a number or a numeric string. Out-of-range values are kept
/// saturated so validation can report them instead of silently dropping them.
pub fn opt_u8<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from_value(Value::deserialize(deserializer)?)
        .map(|n| n.clamp(0, i64::from(u8::MAX)) as u8))
}

/// `u32` from a number or a numeric string; anything else is 0.
pub fn u32_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from_value(Value::deserialize(deserializer)?)
        .map(|n| n.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0))
}

/// `bool` from a bool, `"true"`/`"false"`, or null (false).
pub fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn opt_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number_from_value(value: Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(parse_date("2020-01-15"), Some(ymd(2020, 1, 15)));
    }

    #[test]
    fn test_parse_date_timestamp_forms() {
        assert_eq!(parse_date("2020-01-15T00:00:00Z"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_date("2020-01-15T08:30:00"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_date("2020-01-15T08:30:00.000"), Some(ymd(2020, 1, 15)));
    }

    #[test]
    fn test_parse_date_partial_forms() {
        assert_eq!(parse_date("2019-06"), Some(ymd(2019, 6, 1)));
        assert_eq!(parse_date("2019/06"), Some(ymd(2019, 6, 1)));
        assert_eq!(parse_date("2019"), Some(ymd(2019, 1, 1)));
        assert_eq!(parse_date("March 2021"), Some(ymd(2021, 3, 1)));
        assert_eq!(parse_date("Mar 2021"), Some(ymd(2021, 3, 1)));
    }

    #[test]
    fn test_parse_date_open_ended_and_garbage() {
        assert_eq!(parse_date("Present"), None);
        assert_eq!(parse_date("  current "), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("sometime soon"), None);
        assert_eq!(parse_date("2019-13"), None);
    }

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "date")]
        when: Option<NaiveDate>,
        #[serde(default, deserialize_with = "string")]
        name: String,
        #[serde(default, deserialize_with = "opt_f64")]
        gpa: Option<f64>,
        #[serde(default, deserialize_with = "opt_u8")]
        level: Option<u8>,
        #[serde(default, deserialize_with = "u32_or_zero")]
        years: u32,
        #[serde(default, deserialize_with = "bool_or_false")]
        current: bool,
    }

    #[test]
    fn test_lenient_fields_accept_loose_json() {
        let json = r#"{"when": 2018, "name": null, "gpa": "3.75", "level": "4", "years": "2.6", "current": "TRUE"}"#;
        let p: Probe = serde_json::from_str(json).unwrap();
        assert_eq!(p.when, Some(ymd(2018, 1, 1)));
        assert_eq!(p.name, "");
        assert_eq!(p.gpa, Some(3.75));
        assert_eq!(p.level, Some(4));
        assert_eq!(p.years, 3);
        assert!(p.current);
    }

    #[test]
    fn test_lenient_fields_default_when_missing() {
        let p: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(p.when, None);
        assert!(p.name.is_empty());
        assert_eq!(p.gpa, None);
        assert_eq!(p.level, None);
        assert_eq!(p.years, 0);
        assert!(!p.current);
    }

    #[test]
    fn test_opt_u8_saturates_out_of_range() {
        let p: Probe = serde_json::from_str(r#"{"level": 900}"#).unwrap();
        assert_eq!(p.level, Some(255));
    }
}
