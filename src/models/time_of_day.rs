//! Wall-clock time of day ("HH:MM", 24h) with no date or timezone.
//!
//! Parsing is strict so an out-of-range or malformed value never reaches
//! the schedule partitioner.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

static HH_MM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid time of day '{0}': expected HH:MM between 00:00 and 23:59")]
pub struct TimeOfDayError(pub String);

/// A scheduled time of day. Ordering matches minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeOfDayError> {
        if hour > 23 || minute > 59 {
            return Err(TimeOfDayError(format!("{hour}:{minute}")));
        }
        Ok(Self { hour, minute })
    }

    /// Truncate any clock reading to its hour and minute.
    pub fn from_clock<T: Timelike>(t: &T) -> Self {
        // Timelike guarantees hour < 24 and minute < 60.
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
        }
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour.into(), self.minute.into(), 0).unwrap_or_default()
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = HH_MM
            .captures(s)
            .ok_or_else(|| TimeOfDayError(s.to_string()))?;
        let hour = caps[1].parse().map_err(|_| TimeOfDayError(s.to_string()))?;
        let minute = caps[2].parse().map_err(|_| TimeOfDayError(s.to_string()))?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeOfDayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
