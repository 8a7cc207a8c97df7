//! Time-of-day handling for timetable data.
//!
//! The data source provides departures and arrivals as "HH:MM" strings with
//! no date attached. A trip that arrives earlier in the day than it departs
//! is taken to cross midnight once.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A validated time of day.
///
/// Ordering matches the lexicographic ordering of the zero-padded "HH:MM"
/// form, so sorting by `ClockTime` sorts the way the raw strings would.
///
/// # Examples
///
/// ```
/// use bus_timetable::domain::ClockTime;
///
/// let t = ClockTime::parse_hhmm("07:45").unwrap();
/// assert_eq!(t.to_string(), "07:45");
/// assert_eq!(t.minutes_since_midnight(), 465);
///
/// assert!(ClockTime::parse_hhmm("7:45").is_err());
/// assert!(ClockTime::parse_hhmm("24:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Parse a time from exactly "HH:MM".
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new(s, "expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new(s, "expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new(s, "invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new(s, "hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new(s, "invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new(s, "minute must be 0-59"));
        }

        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| TimeError::new(s, "invalid time"))
    }

    /// Build from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes elapsed since 00:00.
    pub fn minutes_since_midnight(&self) -> u16 {
        (self.hour() * 60 + self.minute()) as u16
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hhmm(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Elapsed time of a single trip, always less than one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TripDuration {
    pub hours: u16,
    pub minutes: u16,
}

impl TripDuration {
    /// Duration from `departure` to `arrival`, wrapping past midnight at most once.
    ///
    /// ```
    /// use bus_timetable::domain::{ClockTime, TripDuration};
    ///
    /// let dep = ClockTime::parse_hhmm("23:00").unwrap();
    /// let arr = ClockTime::parse_hhmm("01:00").unwrap();
    /// let d = TripDuration::between(dep, arr);
    /// assert_eq!((d.hours, d.minutes), (2, 0));
    /// ```
    pub fn between(departure: ClockTime, arrival: ClockTime) -> Self {
        let dep = i32::from(departure.minutes_since_midnight());
        let arr = i32::from(arrival.minutes_since_midnight());
        let total = (arr - dep).rem_euclid(i32::from(MINUTES_PER_DAY)) as u16;
        Self::from_minutes(total)
    }

    fn from_minutes(total: u16) -> Self {
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }

    /// Total length in minutes.
    pub fn total_minutes(&self) -> u16 {
        self.hours * 60 + self.minutes
    }
}

impl fmt::Display for TripDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Parse two "HH:MM" strings and compute the trip duration between them.
pub fn compute_duration(departure: &str, arrival: &str) -> Result<TripDuration, TimeError> {
    let departure = ClockTime::parse_hhmm(departure)?;
    let arrival = ClockTime::parse_hhmm(arrival)?;
    Ok(TripDuration::between(departure, arrival))
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
