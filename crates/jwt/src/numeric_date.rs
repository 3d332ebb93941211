use std::convert::TryFrom;

use chrono::{prelude::*, SecondsFormat};
use serde::{Deserialize, Serialize, Serializer};

/// Represents NumericDate (see https://datatracker.ietf.org/doc/html/rfc7519#section-2)
/// where the range is restricted to +-8.64e15 milliseconds (+-100,000,000 days) around the
/// Unix epoch, the range of an ECMAScript `Date`. Within it an f64 still resolves whole
/// milliseconds. Note that leap seconds are ignored by this type, just as they're ignored by
/// NumericDate in the JWT standard.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, PartialOrd)]
#[serde(try_from = "f64")]
pub struct NumericDate(#[serde(serialize_with = "interop_serialize")] f64);

/// As many JWT libraries only accept integers, this serializer aims for a
/// middle ground by serializing a date as an integer if it does not have
/// fractional seconds. Otherwise a trailing `.0` is always present.
fn interop_serialize<S>(x: &f64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if x.fract() != 0.0 {
        s.serialize_f64(*x)
    } else {
        s.serialize_i64(*x as i64)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum NumericDateConversionError {
    #[error("Not a number")]
    Nan,
    #[error("Out of valid range of NumericDate")]
    OutOfRange,
}

impl NumericDate {
    /// -8.64e12 seconds, i.e. -271821-04-20T00:00:00Z.
    pub const MIN: NumericDate = NumericDate(-8_640_000_000_000.0);
    /// 8.64e12 seconds, i.e. +275760-09-13T00:00:00Z.
    pub const MAX: NumericDate = NumericDate(8_640_000_000_000.0);

    /// Return the f64-valued number of seconds represented by this NumericDate.
    pub fn as_seconds(self) -> f64 {
        self.0
    }

    /// Try to create NumericDate from a f64 value, returning error upon out-of-range.
    pub fn try_from_seconds(seconds: f64) -> Result<Self, NumericDateConversionError> {
        if seconds.is_nan() {
            Err(NumericDateConversionError::Nan)
        } else if seconds.abs() > Self::MAX.0 {
            Err(NumericDateConversionError::OutOfRange)
        } else {
            Ok(NumericDate(seconds))
        }
    }

    /// Instant this date designates, truncated to whole milliseconds.
    ///
    /// `None` for the few years at either end of the range that `chrono`
    /// cannot represent.
    pub fn to_date_time(self) -> Option<DateTime<Utc>> {
        let millis = (self.0 * 1000.0).trunc();
        if !millis.is_finite() {
            return None;
        }
        Utc.timestamp_millis_opt(millis as i64).single()
    }

    /// Formats this date as an ISO 8601 UTC date-time with millisecond
    /// precision, e.g. `2020-09-13T12:26:40.000Z`.
    pub fn to_iso_string(self) -> Option<String> {
        self.to_date_time()
            .map(|time| time.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Parses a date string into whole seconds since the epoch, rounding
    /// down.
    ///
    /// Accepts RFC 3339 and RFC 2822 date-times, date-times without an offset
    /// and plain `YYYY-MM-DD` dates; the last two are read as UTC. Returns
    /// `None` for anything else.
    pub fn from_date_string(date: &str) -> Option<Self> {
        let time = parse_date_time(date.trim())?;
        let seconds = time.timestamp_millis().div_euclid(1000);
        Self::try_from_seconds(seconds as f64).ok()
    }
}

fn parse_date_time(date: &str) -> Option<DateTime<Utc>> {
    let offset_time =
        DateTime::parse_from_rfc3339(date).or_else(|_| DateTime::parse_from_rfc2822(date));
    if let Ok(time) = offset_time {
        return Some(time.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(date, format) {
            return Some(Utc.from_utc_datetime(&time));
        }
    }
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0)?))
}

impl TryFrom<f64> for NumericDate {
    type Error = NumericDateConversionError;

    fn try_from(seconds: f64) -> Result<Self, Self::Error> {
        Self::try_from_seconds(seconds)
    }
}

impl TryFrom<i64> for NumericDate {
    type Error = NumericDateConversionError;

    fn try_from(seconds: i64) -> Result<Self, Self::Error> {
        Self::try_from_seconds(seconds as f64)
    }
}
