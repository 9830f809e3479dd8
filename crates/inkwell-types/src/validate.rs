//! Field normalization shared by every entity.
//!
//! Each entity calls these from its constructor and setters, so a value is
//! checked the same way whether it comes from a caller or from a stored row.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, Utc};
use regex::Regex;
use uuid::Uuid;

use crate::error::ValidationError;

/// Storage encoding for timestamps (UTC, microsecond precision).
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Years `DATE_FORMAT` renders as exactly four digits.
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2}) ([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]{1,6}))?$")
        .expect("date pattern compiles")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("email pattern compiles")
});

const EMAIL_PUNCTUATION: &str = "!#$%&'*+-=?^_`{|}~@.[]";

// -- Identifiers --

/// Anything an identifier can be built from.
#[derive(Debug, Clone, Copy)]
pub enum UuidInput<'a> {
    Uuid(Uuid),
    /// Canonical hyphenated form.
    Str(&'a str),
    /// Compact 16-byte form, as stored.
    Bytes(&'a [u8]),
}

impl From<Uuid> for UuidInput<'_> {
    fn from(uuid: Uuid) -> Self {
        Self::Uuid(uuid)
    }
}

impl<'a> From<&'a Uuid> for UuidInput<'a> {
    fn from(uuid: &'a Uuid) -> Self {
        Self::Uuid(*uuid)
    }
}

impl<'a> From<&'a str> for UuidInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Str(text)
    }
}

impl<'a> From<&'a String> for UuidInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Str(text)
    }
}

impl<'a> From<&'a [u8]> for UuidInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a [u8; 16]> for UuidInput<'a> {
    fn from(bytes: &'a [u8; 16]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for UuidInput<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Normalize an identifier. Malformed input is an invalid argument; a
/// well-formed identifier that is not version 4 is out of range.
pub fn validate_uuid<'a>(
    field: &'static str,
    input: impl Into<UuidInput<'a>>,
) -> Result<Uuid, ValidationError> {
    let uuid = match input.into() {
        UuidInput::Uuid(uuid) => uuid,
        UuidInput::Str(text) => {
            let text = text.trim();
            if text.len() != 36 {
                return Err(ValidationError::invalid(field, "not a canonical uuid string"));
            }
            Uuid::try_parse(text).map_err(|e| ValidationError::invalid(field, e.to_string()))?
        }
        UuidInput::Bytes(bytes) => Uuid::from_slice(bytes).map_err(|_| {
            ValidationError::invalid(field, format!("expected 16 bytes, got {}", bytes.len()))
        })?,
    };

    if uuid.get_version_num() != 4 {
        return Err(ValidationError::range(field, "not a version 4 uuid"));
    }

    Ok(uuid)
}

// -- Timestamps --

/// Anything a timestamp can be built from. `Now` stands in for an unset date.
#[derive(Debug, Clone, Copy, Default)]
pub enum DateInput<'a> {
    #[default]
    Now,
    DateTime(DateTime<Utc>),
    /// `YYYY-MM-DD HH:MM:SS[.ffffff]`, UTC.
    Str(&'a str),
}

impl From<DateTime<Utc>> for DateInput<'_> {
    fn from(date: DateTime<Utc>) -> Self {
        Self::DateTime(date)
    }
}

impl From<Option<DateTime<Utc>>> for DateInput<'_> {
    fn from(date: Option<DateTime<Utc>>) -> Self {
        date.map_or(Self::Now, Self::DateTime)
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Str(text)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Str(text)
    }
}

/// Normalize a timestamp to microsecond precision.
pub fn validate_date<'a>(
    field: &'static str,
    input: impl Into<DateInput<'a>>,
) -> Result<DateTime<Utc>, ValidationError> {
    let date = match input.into() {
        DateInput::Now => Utc::now(),
        DateInput::DateTime(date) => date,
        DateInput::Str(text) => parse_date(field, text)?,
    };
    if !STORABLE_YEARS.contains(&date.year()) {
        return Err(ValidationError::range(
            field,
            format!("year {} is outside 0000..=9999", date.year()),
        ));
    }
    Ok(date.trunc_subsecs(6))
}

/// Render a timestamp the way it is stored.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(field: &'static str, text: &str) -> Result<DateTime<Utc>, ValidationError> {
    let caps = DATE_RE
        .captures(text.trim())
        .ok_or_else(|| ValidationError::invalid(field, format!("{text:?} is not a valid date")))?;

    let num = |idx: usize| -> Result<u32, ValidationError> {
        caps.get(idx)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(|| ValidationError::invalid(field, format!("{text:?} is not a valid date")))
    };

    let date = NaiveDate::from_ymd_opt(num(1)? as i32, num(2)?, num(3)?)
        .ok_or_else(|| ValidationError::range(field, format!("{text:?} is not a calendar date")))?;

    // the pattern caps the fraction at six ASCII digits
    let micros = match caps.get(7) {
        Some(m) => {
            let digits = m.as_str();
            let value: u32 = digits.parse().map_err(|_| {
                ValidationError::invalid(field, format!("{text:?} is not a valid date"))
            })?;
            value * 10u32.pow(6 - digits.len() as u32)
        }
        None => 0,
    };
    let time = NaiveTime::from_hms_micro_opt(num(4)?, num(5)?, num(6)?, micros)
        .ok_or_else(|| ValidationError::range(field, format!("{text:?} is not a valid time")))?;

    Ok(NaiveDateTime::new(date, time).and_utc())
}

// -- Text --

/// Trim, then drop markup tags and control characters (newline and tab survive).
pub fn sanitize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.trim().chars().peekable();

    while let Some(c) = chars.next() {
        let opens_tag = c == '<'
            && chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?'));
        if opens_tag {
            for skipped in chars.by_ref() {
                if skipped == '>' {
                    break;
                }
            }
            continue;
        }
        if c.is_control() && !matches!(c, '\n' | '\t') {
            continue;
        }
        out.push(c);
    }

    out.trim().to_string()
}

/// Sanitize and bound a required text field. Length is counted in characters.
pub fn validate_text(
    field: &'static str,
    raw: &str,
    max_len: usize,
) -> Result<String, ValidationError> {
    let text = sanitize_text(raw);
    if text.is_empty() {
        return Err(ValidationError::invalid(field, "empty or insecure"));
    }

    let len = text.chars().count();
    if len > max_len {
        return Err(ValidationError::range(
            field,
            format!("{len} characters exceeds the maximum of {max_len}"),
        ));
    }

    Ok(text)
}

pub fn validate_optional_text(
    field: &'static str,
    raw: Option<&str>,
    max_len: usize,
) -> Result<Option<String>, ValidationError> {
    raw.map(|text| validate_text(field, text, max_len)).transpose()
}

// -- Email --

/// Trim and drop every character that cannot appear in an address.
pub fn sanitize_email(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || EMAIL_PUNCTUATION.contains(*c))
        .collect()
}

pub fn validate_email(
    field: &'static str,
    raw: &str,
    max_len: usize,
) -> Result<String, ValidationError> {
    let email = sanitize_email(raw);
    if email.is_empty() {
        return Err(ValidationError::invalid(field, "empty or insecure"));
    }
    if email.len() > max_len {
        return Err(ValidationError::range(
            field,
            format!("{} characters exceeds the maximum of {max_len}", email.len()),
        ));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::invalid(field, format!("{email:?} is not a valid email")));
    }

    Ok(email)
}

// -- Hex --

pub fn normalize_hex(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Non-empty and made only of hex digits.
pub fn is_hex(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn uuid_accepts_every_encoding() {
        let id = Uuid::new_v4();
        let text = id.to_string();

        assert_eq!(validate_uuid("id", id).unwrap(), id);
        assert_eq!(validate_uuid("id", text.as_str()).unwrap(), id);
        assert_eq!(validate_uuid("id", id.as_bytes()).unwrap(), id);
        assert_eq!(validate_uuid("id", &id.as_bytes().to_vec()).unwrap(), id);
    }

    #[test]
    fn uuid_rejects_malformed_input() {
        let err = validate_uuid("id", "not-a-uuid").unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.field(), "id");

        let err = validate_uuid("id", &[0u8; 15][..]).unwrap_err();
        assert!(err.is_invalid_argument());

        // right length, bad digit
        let err = validate_uuid("id", "zzzzzzzz-e29b-41d4-a716-446655440000").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn uuid_requires_version_4() {
        let err = validate_uuid("id", "6fa459ea-ee8a-1ca4-894e-db77e160355e").unwrap_err();
        assert!(err.is_range());

        assert!(validate_uuid("id", Uuid::nil()).unwrap_err().is_range());
    }

    #[test]
    fn date_parses_storage_format() {
        let date = validate_date("date", "2024-02-29 13:45:07.5").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 2, 29));
        assert_eq!((date.hour(), date.minute(), date.second()), (13, 45, 7));
        assert_eq!(date.nanosecond(), 500_000_000);

        let date = validate_date("date", "2017-10-05 08:00:00").unwrap();
        assert_eq!(date.nanosecond(), 0);
    }

    #[test]
    fn date_round_trips_through_storage_format() {
        let now = validate_date("date", DateInput::Now).unwrap();
        let stored = format_date(&now);
        assert_eq!(validate_date("date", stored.as_str()).unwrap(), now);
    }

    #[test]
    fn date_rejects_impossible_values_as_range() {
        for text in [
            "2023-02-29 00:00:00",
            "2024-02-30 12:00:00",
            "2023-13-01 00:00:00",
            "2023-01-01 24:00:00",
            "2023-01-01 23:60:00",
        ] {
            let err = validate_date("date", text).unwrap_err();
            assert!(err.is_range(), "{text} should be a range error, got {err}");
        }
    }

    #[test]
    fn date_rejects_malformed_strings_as_invalid() {
        for text in ["yesterday", "", "2023/01/01 00:00:00", "2023-01-01"] {
            let err = validate_date("date", text).unwrap_err();
            assert!(err.is_invalid_argument(), "{text:?} should be invalid, got {err}");
        }
    }

    #[test]
    fn date_rejects_non_ascii_digits_as_invalid() {
        // Arabic-Indic digits in each part of the timestamp
        for text in [
            "\u{662}\u{660}\u{662}\u{664}-01-01 00:00:00",
            "2024-\u{660}\u{661}-01 00:00:00",
            "2024-01-\u{660}\u{661} 00:00:00",
            "2024-01-01 \u{660}\u{660}:00:00",
            "2024-01-01 00:\u{660}\u{660}:00",
            "2024-01-01 00:00:\u{660}\u{660}",
            "2024-01-01 00:00:00.\u{660}\u{660}\u{660}\u{660}",
            "2024-01-01 00:00:00.\u{660}",
        ] {
            let err = validate_date("date", text).unwrap_err();
            assert!(err.is_invalid_argument(), "{text:?} should be invalid, got {err}");
        }
    }

    #[test]
    fn date_fraction_is_at_most_six_digits() {
        let date = validate_date("date", "2024-01-01 00:00:00.123456").unwrap();
        assert_eq!(date.nanosecond(), 123_456_000);

        let err = validate_date("date", "2024-01-01 00:00:00.1234567").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn date_outside_four_digit_years_is_range() {
        let late = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        let early = Utc.with_ymd_and_hms(-1, 12, 31, 23, 59, 59).unwrap();
        for date in [late, early] {
            let err = validate_date("date", date).unwrap_err();
            assert!(err.is_range(), "{date} should be a range error, got {err}");
        }

        let first = Utc.with_ymd_and_hms(0, 1, 1, 0, 0, 0).unwrap();
        let last = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        for date in [first, last] {
            let stored = format_date(&validate_date("date", date).unwrap());
            assert_eq!(validate_date("date", stored.as_str()).unwrap(), date);
        }
    }

    #[test]
    fn unset_date_is_now() {
        let before = Utc::now().trunc_subsecs(6);
        let date = validate_date("date", None::<DateTime<Utc>>).unwrap();
        assert!(date >= before);
        assert!(date <= Utc::now());
    }

    #[test]
    fn sanitize_strips_tags_and_controls() {
        assert_eq!(sanitize_text("  <b>Ken</b> Keyes \u{0}"), "Ken Keyes");
        assert_eq!(sanitize_text("a < b"), "a < b");
        assert_eq!(sanitize_text("line one\nline two"), "line one\nline two");
        assert_eq!(sanitize_text("<script>alert(1)</script>"), "alert(1)");
        assert_eq!(sanitize_text("<p>"), "");
    }

    #[test]
    fn text_bounds() {
        assert!(validate_text("name", "   ", 32).unwrap_err().is_invalid_argument());
        assert!(validate_text("name", "<br/>", 32).unwrap_err().is_invalid_argument());
        assert!(validate_text("name", &"x".repeat(33), 32).unwrap_err().is_range());
        assert_eq!(validate_text("name", &"x".repeat(32), 32).unwrap().len(), 32);
        // multi-byte characters count once
        assert!(validate_text("name", &"é".repeat(32), 32).is_ok());
    }

    #[test]
    fn optional_text_passes_none_through() {
        assert_eq!(validate_optional_text("phone", None, 32).unwrap(), None);
        assert_eq!(
            validate_optional_text("phone", Some(" 505-555-0100 "), 32).unwrap(),
            Some("505-555-0100".to_string())
        );
    }

    #[test]
    fn email_validation() {
        assert_eq!(
            validate_email("email", "  ken@example.com ", 128).unwrap(),
            "ken@example.com"
        );
        // disallowed characters are stripped before the syntax check
        assert_eq!(
            validate_email("email", "ken()@example.com", 128).unwrap(),
            "ken@example.com"
        );
        assert!(validate_email("email", "   ", 128).unwrap_err().is_invalid_argument());
        assert!(validate_email("email", "ken.example.com", 128).unwrap_err().is_invalid_argument());
        assert!(validate_email("email", "ken@localhost", 128).unwrap_err().is_invalid_argument());

        let long = format!("{}@example.com", "k".repeat(120));
        assert!(validate_email("email", &long, 128).unwrap_err().is_range());
    }

    #[test]
    fn hex_helpers() {
        assert_eq!(normalize_hex("  ABCdef01 "), "abcdef01");
        assert!(is_hex("0123456789abcdef"));
        assert!(!is_hex(""));
        assert!(!is_hex("xyz"));
    }
}
