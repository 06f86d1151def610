use std::convert::TryFrom;
use std::fmt::{self, Debug, Display};
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::model::OutOfRangeError;

const NANOS_PER_SEC: u64 = 1_000_000_000;
const MICROS_PER_SEC: u64 = 1_000_000;
const MILLIS_PER_SEC: u64 = 1_000;

// days from 0001-01-01 to 1970-01-01 in the proleptic Gregorian calendar
const DAYS_FROM_CE_TO_UNIX_EPOCH: i32 = 719_163;

/// A timestamp with nanosecond precision.
///
/// Stored as whole seconds since the unix epoch plus a nanosecond offset
/// that is always in `0..1_000_000_000`. Rendered as ISO-8601 with exactly
/// nine fractional digits, e.g. `2017-02-24T12:49:17.021000000Z`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HighPrecisionTime {
    pub(crate) secs: i64,
    pub(crate) nanos: u32,
}

/// A calendar date without time of day.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    pub(crate) date: NaiveDate,
}

impl HighPrecisionTime {
    /// 0001-01-01T00:00:00Z
    pub const MIN: HighPrecisionTime =
        HighPrecisionTime { secs: -62_135_596_800, nanos: 0 };
    /// 9999-12-31T23:59:59.999999999Z
    pub const MAX: HighPrecisionTime =
        HighPrecisionTime { secs: 253_402_300_799, nanos: 999_999_999 };
    pub const UNIX_EPOCH: HighPrecisionTime =
        HighPrecisionTime { secs: 0, nanos: 0 };

    fn try_new(secs: i64, nanos: u32) -> Result<HighPrecisionTime, OutOfRangeError> {
        let value = HighPrecisionTime { secs, nanos };
        if value < Self::MIN || value > Self::MAX {
            return Err(OutOfRangeError);
        }
        Ok(value)
    }

    fn try_carry(secs: i64, offset: u64, per_sec: u64)
        -> Result<HighPrecisionTime, OutOfRangeError>
    {
        let carry = i64::try_from(offset / per_sec)?;
        let secs = secs.checked_add(carry).ok_or(OutOfRangeError)?;
        let nanos = (offset % per_sec) * (NANOS_PER_SEC / per_sec);
        Self::try_new(secs, nanos as u32)
    }

    pub fn try_from_secs(secs: i64) -> Result<HighPrecisionTime, OutOfRangeError> {
        Self::try_new(secs, 0)
    }

    /// Offsets of a second or more are carried into `secs`.
    pub fn try_with_nanos(secs: i64, nanos: u64)
        -> Result<HighPrecisionTime, OutOfRangeError>
    {
        Self::try_carry(secs, nanos, NANOS_PER_SEC)
    }

    pub fn try_with_micros(secs: i64, micros: u64)
        -> Result<HighPrecisionTime, OutOfRangeError>
    {
        Self::try_carry(secs, micros, MICROS_PER_SEC)
    }

    pub fn try_with_millis(secs: i64, millis: u64)
        -> Result<HighPrecisionTime, OutOfRangeError>
    {
        Self::try_carry(secs, millis, MILLIS_PER_SEC)
    }

    /// Panics if the result is outside of [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
    pub fn from_secs(secs: i64) -> HighPrecisionTime {
        Self::try_from_secs(secs).unwrap_or_else(|_| panic!(
            "HighPrecisionTime::from_secs({}) is outside the valid range",
            secs))
    }

    /// Panics if the result is outside of [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
    pub fn with_nanos(secs: i64, nanos: u64) -> HighPrecisionTime {
        Self::try_with_nanos(secs, nanos).unwrap_or_else(|_| panic!(
            "HighPrecisionTime::with_nanos({}, {}) is outside the valid range",
            secs, nanos))
    }

    /// Panics if the result is outside of [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
    pub fn with_micros(secs: i64, micros: u64) -> HighPrecisionTime {
        Self::try_with_micros(secs, micros).unwrap_or_else(|_| panic!(
            "HighPrecisionTime::with_micros({}, {}) is outside the valid range",
            secs, micros))
    }

    /// Panics if the result is outside of [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
    pub fn with_millis(secs: i64, millis: u64) -> HighPrecisionTime {
        Self::try_with_millis(secs, millis).unwrap_or_else(|_| panic!(
            "HighPrecisionTime::with_millis({}, {}) is outside the valid range",
            secs, millis))
    }

    pub fn secs(&self) -> i64 {
        self.secs
    }

    pub fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    pub fn to_datetime(self) -> DateTime<Utc> {
        match DateTime::from_timestamp(self.secs, self.nanos) {
            Some(dt) => dt,
            // every value in MIN..=MAX is representable
            None => DateTime::<Utc>::MIN_UTC,
        }
    }

    pub fn from_datetime(value: &DateTime<Utc>)
        -> Result<HighPrecisionTime, OutOfRangeError>
    {
        // leap seconds are represented by chrono as nanos above one second
        Self::try_with_nanos(value.timestamp(),
                             value.timestamp_subsec_nanos().into())
    }
}

impl Display for HighPrecisionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_datetime().format("%Y-%m-%dT%H:%M:%S%.9fZ"))
    }
}

impl Debug for HighPrecisionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for HighPrecisionTime {
    type Err = ParseTimeError;
    fn from_str(s: &str) -> Result<HighPrecisionTime, ParseTimeError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(ParseTimeError::Format)?;
        Self::from_datetime(&dt.with_timezone(&Utc))
            .map_err(ParseTimeError::OutOfRange)
    }
}

impl TryFrom<DateTime<Utc>> for HighPrecisionTime {
    type Error = OutOfRangeError;
    fn try_from(value: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_datetime(&value)
    }
}

impl From<HighPrecisionTime> for DateTime<Utc> {
    fn from(value: HighPrecisionTime) -> DateTime<Utc> {
        value.to_datetime()
    }
}

impl TryFrom<SystemTime> for HighPrecisionTime {
    type Error = OutOfRangeError;
    fn try_from(value: SystemTime) -> Result<Self, Self::Error> {
        match value.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::try_with_nanos(
                i64::try_from(after.as_secs())?,
                after.subsec_nanos().into(),
            ),
            Err(e) => {
                let before = e.duration();
                let secs = -i64::try_from(before.as_secs())?;
                match before.subsec_nanos() {
                    0 => Self::try_from_secs(secs),
                    nanos => Self::try_new(secs - 1, NANOS_PER_SEC as u32 - nanos),
                }
            }
        }
    }
}

impl TryFrom<HighPrecisionTime> for SystemTime {
    type Error = OutOfRangeError;
    fn try_from(value: HighPrecisionTime) -> Result<Self, Self::Error> {
        let whole = Duration::from_secs(value.secs.unsigned_abs());
        let base = if value.secs >= 0 {
            UNIX_EPOCH.checked_add(whole)
        } else {
            UNIX_EPOCH.checked_sub(whole)
        };
        base.and_then(|t| t.checked_add(Duration::from_nanos(value.nanos.into())))
            .ok_or(OutOfRangeError)
    }
}

/// Error returned when parsing a [`HighPrecisionTime`] from text.
#[derive(Debug)]
pub enum ParseTimeError {
    /// Not an RFC 3339 timestamp.
    Format(chrono::ParseError),
    /// A valid timestamp outside of the supported range of years.
    OutOfRange(OutOfRangeError),
}

impl Display for ParseTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseTimeError::Format(e) => Display::fmt(e, f),
            ParseTimeError::OutOfRange(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for ParseTimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseTimeError::Format(e) => Some(e),
            ParseTimeError::OutOfRange(e) => Some(e),
        }
    }
}

impl Date {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Date, OutOfRangeError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(|date| Date { date })
            .ok_or(OutOfRangeError)
    }

    /// Date that is `days` after (or before, if negative) 1970-01-01.
    pub fn from_days(days: i64) -> Result<Date, OutOfRangeError> {
        let days = i32::try_from(days)?
            .checked_add(DAYS_FROM_CE_TO_UNIX_EPOCH)
            .ok_or(OutOfRangeError)?;
        NaiveDate::from_num_days_from_ce_opt(days)
            .map(|date| Date { date })
            .ok_or(OutOfRangeError)
    }

    pub fn to_days(self) -> i64 {
        i64::from(self.date.num_days_from_ce()) - i64::from(DAYS_FROM_CE_TO_UNIX_EPOCH)
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn to_naive_date(self) -> NaiveDate {
        self.date
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

impl Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for Date {
    type Err = chrono::ParseError;
    fn from_str(s: &str) -> Result<Date, chrono::ParseError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|date| Date { date })
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Date {
        Date { date }
    }
}

impl From<Date> for NaiveDate {
    fn from(value: Date) -> NaiveDate {
        value.date
    }
}
