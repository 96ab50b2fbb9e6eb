//! Schedule times.
//!
//! Feeds give stop times as "HH:MM:SS" strings measured from the start of
//! the service day. Trips that run past midnight use hours of 24 and above,
//! so a schedule time is not a time of day.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::SECONDS_PER_DAY;

/// Error returned when parsing an invalid schedule time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid schedule time: {reason}")]
pub struct ScheduleTimeError {
    reason: &'static str,
}

impl ScheduleTimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Seconds after the start of a service day.
///
/// # Examples
///
/// ```
/// use transit_router::feed::ScheduleTime;
///
/// let t = ScheduleTime::parse("25:10:00").unwrap();
/// assert_eq!(t.seconds(), 25 * 3600 + 600);
/// assert_eq!(t.day_offset(), 1);
/// assert_eq!(t.time_of_day(), 3600 + 600);
/// assert_eq!(t.to_string(), "25:10:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleTime(u32);

impl ScheduleTime {
    /// Create a schedule time from seconds after the start of the service day.
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Parse "H:MM:SS" or "HH:MM:SS". Hours may exceed 23.
    pub fn parse(s: &str) -> Result<Self, ScheduleTimeError> {
        let mut parts = s.split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ScheduleTimeError::new("expected HH:MM:SS format"));
        };

        if h.is_empty() || h.len() > 3 || m.len() != 2 || sec.len() != 2 {
            return Err(ScheduleTimeError::new("expected HH:MM:SS format"));
        }

        let hours = parse_digits(h).ok_or_else(|| ScheduleTimeError::new("invalid hour digits"))?;
        let minutes =
            parse_digits(m).ok_or_else(|| ScheduleTimeError::new("invalid minute digits"))?;
        let seconds =
            parse_digits(sec).ok_or_else(|| ScheduleTimeError::new("invalid second digits"))?;

        if minutes > 59 {
            return Err(ScheduleTimeError::new("minute must be 0-59"));
        }
        if seconds > 59 {
            return Err(ScheduleTimeError::new("second must be 0-59"));
        }

        Ok(Self(hours * 3600 + minutes * 60 + seconds))
    }

    /// Seconds after the start of the service day.
    pub fn seconds(self) -> u32 {
        self.0
    }

    /// Seconds after midnight of the calendar day the event falls on.
    pub fn time_of_day(self) -> u32 {
        self.0 % SECONDS_PER_DAY
    }

    /// Whole days between the service day and the calendar day of the event.
    pub fn day_offset(self) -> u32 {
        self.0 / SECONDS_PER_DAY
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl TryFrom<String> for ScheduleTime {
    type Error = ScheduleTimeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ScheduleTime> for String {
    fn from(t: ScheduleTime) -> String {
        t.to_string()
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        write!(f, "{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
    }
}
