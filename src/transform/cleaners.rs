//! Column-level cleaning functions

use crate::types::NamePolicy;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// First run of ASCII digits
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Value substituted when a field holds no digits
pub const MISSING_DIGITS: &str = "0";

/// Keep the first run of digits in `value`, or [`MISSING_DIGITS`]
pub fn extract_digits(value: Option<&str>) -> String {
    value
        .and_then(|v| DIGIT_RUN.find(v))
        .map_or_else(|| MISSING_DIGITS.to_string(), |m| m.as_str().to_string())
}

/// Parse a birthdate against `formats`, first match wins.
///
/// Date-only formats map to midnight. Values that parse but cannot be
/// stored as a nanosecond timestamp are treated like unparseable ones.
pub fn parse_birthdate(value: Option<&str>, formats: &[String]) -> Option<NaiveDateTime> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    formats
        .iter()
        .find_map(|format| {
            NaiveDateTime::parse_from_str(value, format)
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(value, format)
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
        })
        .filter(|dt| timestamp_nanos(dt).is_some())
}

/// Nanoseconds since the Unix epoch, if representable as `i64`
pub fn timestamp_nanos(dt: &NaiveDateTime) -> Option<i64> {
    dt.and_utc().timestamp_nanos_opt()
}

/// Lower-case an email address
pub fn normalize_email(value: Option<&str>) -> Option<String> {
    value.map(str::to_lowercase)
}

/// A full name split into its parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub first: Option<String>,
    pub middle: Option<String>,
    pub last: Option<String>,
}

impl NameParts {
    fn new(first: Option<&str>, middle: Option<String>, last: Option<&str>) -> Self {
        Self {
            first: first.map(str::to_owned),
            middle,
            last: last.map(str::to_owned),
        }
    }
}

/// Split a full name on whitespace.
///
/// Three tokens map to first, middle and last name. Any other count is
/// settled by `policy`; `None` means the row must be dropped.
pub fn split_full_name(value: Option<&str>, policy: NamePolicy) -> Option<NameParts> {
    let tokens: Vec<&str> = value.map(|v| v.split_whitespace().collect()).unwrap_or_default();

    match (tokens.as_slice(), policy) {
        ([first, middle, last], _) => Some(NameParts::new(
            Some(*first),
            Some((*middle).to_string()),
            Some(*last),
        )),
        (_, NamePolicy::Reject) => None,
        ([], NamePolicy::Pad) => Some(NameParts::default()),
        ([first], NamePolicy::Pad) => Some(NameParts::new(Some(*first), None, None)),
        ([first, last], NamePolicy::Pad) => {
            Some(NameParts::new(Some(*first), None, Some(*last)))
        }
        ([first, inner @ .., last], NamePolicy::Pad) => Some(NameParts::new(
            Some(*first),
            Some(inner.join(" ")),
            Some(*last),
        )),
    }
}
