//! Protocol timestamps.
//!
//! Filters accept three shapes: a bare year (`2017`), a date (`2017-03-02`)
//! and a full UTC date-time with an explicit `Z` marker and up to six
//! fractional digits (`2017-03-02T01:01:01.123456Z`). The shorter forms are
//! anchored at the start of the period they name.
//!
//! Stored objects are read with [`Timestamp::parse_envelope`], which accepts
//! the same shapes with any number of fractional digits and truncates them to
//! microseconds.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DatastoreError;

const MAX_FRACTION_DIGITS: usize = 6;

/// A validated point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse any of the accepted timestamp grammars.
    pub fn parse(value: &str) -> Result<Self, DatastoreError> {
        parse_instant(value, Fraction::Strict)
            .map(Timestamp)
            .ok_or_else(|| DatastoreError::InvalidTimestamp(value.to_string()))
    }

    /// Parse a timestamp taken from a stored object. Sub-microsecond digits
    /// are dropped instead of rejected.
    pub fn parse_envelope(value: &str) -> Result<Self, DatastoreError> {
        parse_instant(value, Fraction::Truncate)
            .map(Timestamp)
            .ok_or_else(|| DatastoreError::InvalidTimestamp(value.to_string()))
    }

    /// True when `value` parses as a timestamp.
    pub fn is_valid(value: &str) -> bool {
        parse_instant(value, Fraction::Strict).is_some()
    }

    /// The current time at microsecond precision, the finest the protocol
    /// can express.
    pub fn now() -> Self {
        Timestamp::from_datetime(Utc::now())
    }

    /// Wrap an instant, dropping anything below a microsecond.
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Timestamp(instant.trunc_subsecs(MAX_FRACTION_DIGITS as u16))
    }

    /// The smallest representable step after this instant.
    pub fn next_tick(&self) -> Self {
        Timestamp(self.0 + chrono::Duration::microseconds(1))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Fraction {
    Strict,
    Truncate,
}

fn parse_instant(value: &str, fraction: Fraction) -> Option<DateTime<Utc>> {
    match value.len() {
        4 => parse_year(value),
        10 => parse_date(value),
        _ => parse_date_time(value, fraction),
    }
}

fn parse_year(value: &str) -> Option<DateTime<Utc>> {
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = value.parse().ok()?;
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if !has_date_shape(value) {
        return None;
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

fn parse_date_time(value: &str, mode: Fraction) -> Option<DateTime<Utc>> {
    let body = value.strip_suffix('Z')?;
    if !body.is_ascii()
        || body.len() < 19
        || !has_date_shape(&body[..10])
        || body.as_bytes()[10] != b'T'
    {
        return None;
    }
    let clock = &body[11..19];
    let clock_shape = clock
        .bytes()
        .enumerate()
        .all(|(i, b)| if i == 2 || i == 5 { b == b':' } else { b.is_ascii_digit() });
    if !clock_shape {
        return None;
    }

    let fraction = &body[19..];
    if fraction.is_empty() {
        let naive = NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S").ok()?;
        return Some(Utc.from_utc_datetime(&naive));
    }

    let digits = fraction.strip_prefix('.')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let kept = if digits.len() <= MAX_FRACTION_DIGITS {
        digits
    } else if mode == Fraction::Truncate {
        &digits[..MAX_FRACTION_DIGITS]
    } else {
        return None;
    };

    let trimmed = format!("{}.{}", &body[..19], kept);
    let naive = NaiveDateTime::parse_from_str(&trimmed, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

fn has_date_shape(value: &str) -> bool {
    value.len() == 10
        && value
            .bytes()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() })
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Micros, true))
    }
}

impl FromStr for Timestamp {
    type Err = DatastoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Timestamp::from_datetime(instant)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(de::Error::custom)
    }
}
