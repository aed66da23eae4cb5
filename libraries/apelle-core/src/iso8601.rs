//! ISO-8601 durations on the wire.
//!
//! The server encodes every duration as an ISO-8601 string (`PT3M20S`,
//! `PT1.5S`, `P1DT2H`, `P2W`). Years and months are rejected because they
//! have no fixed length.
//!
//! Use with `#[serde(with = "crate::iso8601::duration")]`.

use chrono::Duration;
use ::iso8601::Duration as IsoDuration;
use std::fmt;

/// Longest run of digits accepted in a single component
const MAX_COMPONENT_DIGITS: usize = 9;

/// Error returned when a duration string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDurationError(String);

impl fmt::Display for ParseDurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid ISO-8601 duration: {}", self.0)
    }
}

impl std::error::Error for ParseDurationError {}

/// Parse an ISO-8601 duration
pub fn parse(input: &str) -> Result<Duration, ParseDurationError> {
    let err = |reason: &str| ParseDurationError(format!("{input:?} ({reason})"));

    // Component values are u32 inside the parser; keep them well below that
    let longest_run = input
        .split(|c: char| !c.is_ascii_digit())
        .map(str::len)
        .max()
        .unwrap_or(0);
    if longest_run > MAX_COMPONENT_DIGITS {
        return Err(err("component too large"));
    }

    let parsed = ::iso8601::duration(input).map_err(|e| err(&e))?;

    match parsed {
        IsoDuration::YMDHMS {
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        } => {
            if year != 0 || month != 0 {
                return Err(err("years and months are not supported"));
            }
            [
                Duration::try_days(day.into()),
                Duration::try_hours(hour.into()),
                Duration::try_minutes(minute.into()),
                Duration::try_seconds(second.into()),
                Duration::try_milliseconds(millisecond.into()),
            ]
            .into_iter()
            .try_fold(Duration::zero(), |total, part| total.checked_add(&part?))
            .ok_or_else(|| err("out of range"))
        }
        IsoDuration::Weeks(weeks) => {
            Duration::try_weeks(weeks.into()).ok_or_else(|| err("out of range"))
        }
    }
}

/// Serde adapter for `chrono::Duration`
pub mod duration {
    use chrono::Duration;
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize as an ISO-8601 string
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.to_string().serialize(serializer)
    }

    /// Deserialize from an ISO-8601 string
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse(&s).map_err(D::Error::custom)
    }
}
