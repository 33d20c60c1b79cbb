//! Human-readable timespan tokens ("15 Minutes", "1 Day", "2 Weeks", ...).
//!
//! A token is parsed once into a `{count, unit}` value; turning it into a
//! duration is then a pure function of that value. Months and years are fixed
//! approximations (30 and 365 days), not calendar-aware.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;

/// Tokens offered by the view selector, in display order.
pub const TIMESPAN_PRESETS: &[&str] = &[
    "All Data",
    "5 Minutes",
    "15 Minutes",
    "30 Minutes",
    "1 Hour",
    "4 Hour",
    "12 Hour",
    "1 Day",
    "1 Week",
    "2 Weeks",
    "1 Month",
    "1 Year",
];

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum TimeUnit {
    #[strum(
        to_string = "Minutes",
        serialize = "minute",
        serialize = "min",
        serialize = "mins"
    )]
    Minute,
    #[strum(
        to_string = "Hours",
        serialize = "hour",
        serialize = "hr",
        serialize = "hrs"
    )]
    Hour,
    #[strum(to_string = "Days", serialize = "day")]
    Day,
    #[strum(to_string = "Weeks", serialize = "week")]
    Week,
    #[strum(to_string = "Months", serialize = "month")]
    Month,
    #[strum(to_string = "Years", serialize = "year")]
    Year,
}

impl TimeUnit {
    /// Length of one unit
    pub fn duration(self) -> Duration {
        match self {
            TimeUnit::Minute => Duration::minutes(1),
            TimeUnit::Hour => Duration::hours(1),
            TimeUnit::Day => Duration::days(1),
            TimeUnit::Week => Duration::days(7),
            TimeUnit::Month => Duration::days(30),
            TimeUnit::Year => Duration::days(365),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimespanParseError {
    #[error("empty timespan")]
    Empty,
    #[error("timespan '{0}' does not start with a count")]
    MissingCount(String),
    #[error("timespan count '{0}' is out of range")]
    BadCount(String),
    #[error("unknown time unit '{0}'")]
    UnknownUnit(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Timespan {
    pub count: u32,
    pub unit: TimeUnit,
}

impl Timespan {
    pub fn new(count: u32, unit: TimeUnit) -> Self {
        Self { count, unit }
    }

    /// `None` when the span does not fit in a `chrono::Duration`
    pub fn duration(&self) -> Option<Duration> {
        let count = i32::try_from(self.count).ok()?;
        self.unit.duration().checked_mul(count)
    }
}

impl FromStr for Timespan {
    type Err = TimespanParseError;

    /// Accepts `<integer><optional whitespace><unit>`, unit matched case-insensitively.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TimespanParseError::Empty);
        }

        let digits_end = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        if digits_end == 0 {
            return Err(TimespanParseError::MissingCount(text.to_string()));
        }

        let (count_str, rest) = text.split_at(digits_end);
        let count = count_str
            .parse::<u32>()
            .map_err(|_| TimespanParseError::BadCount(count_str.to_string()))?;

        let unit_str = rest.trim_start();
        let unit = unit_str
            .parse::<TimeUnit>()
            .map_err(|_| TimespanParseError::UnknownUnit(unit_str.to_string()))?;

        let span = Timespan { count, unit };
        if span.duration().is_none() {
            return Err(TimespanParseError::BadCount(count_str.to_string()));
        }
        Ok(span)
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.count, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_presets() {
        for token in TIMESPAN_PRESETS.iter().skip(1) {
            assert!(token.parse::<Timespan>().is_ok(), "{token} should parse");
        }
        assert!(TIMESPAN_PRESETS[0].parse::<Timespan>().is_err());
    }

    #[test]
    fn test_unit_aliases_and_case() {
        let cases = [
            ("15 Minutes", Timespan::new(15, TimeUnit::Minute)),
            ("15min", Timespan::new(15, TimeUnit::Minute)),
            ("2 MINS", Timespan::new(2, TimeUnit::Minute)),
            ("4 Hour", Timespan::new(4, TimeUnit::Hour)),
            ("3hrs", Timespan::new(3, TimeUnit::Hour)),
            ("1 day", Timespan::new(1, TimeUnit::Day)),
            ("2   Weeks", Timespan::new(2, TimeUnit::Week)),
            ("6 month", Timespan::new(6, TimeUnit::Month)),
            ("1 YEAR", Timespan::new(1, TimeUnit::Year)),
        ];
        for (token, expected) in cases {
            assert_eq!(token.parse::<Timespan>(), Ok(expected), "token {token}");
        }
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!("".parse::<Timespan>(), Err(TimespanParseError::Empty));
        assert!(matches!(
            "banana".parse::<Timespan>(),
            Err(TimespanParseError::MissingCount(_))
        ));
        assert!(matches!(
            "5 fortnights".parse::<Timespan>(),
            Err(TimespanParseError::UnknownUnit(_))
        ));
        assert!(matches!(
            "99999999999 days".parse::<Timespan>(),
            Err(TimespanParseError::BadCount(_))
        ));
        // Fits a u32 but not the i32 multiplier
        assert!(matches!(
            "4294967295 years".parse::<Timespan>(),
            Err(TimespanParseError::BadCount(_))
        ));
    }

    #[test]
    fn test_fixed_length_months_and_years() {
        assert_eq!(Timespan::new(1, TimeUnit::Month).duration(), Some(Duration::days(30)));
        assert_eq!(Timespan::new(2, TimeUnit::Year).duration(), Some(Duration::days(730)));
        assert_eq!(Timespan::new(2, TimeUnit::Week).duration(), Some(Duration::days(14)));
        assert_eq!(Timespan::new(90, TimeUnit::Minute).duration(), Some(Duration::minutes(90)));
        assert_eq!(Timespan::new(u32::MAX, TimeUnit::Year).duration(), None);
    }

    #[test]
    fn test_display_round_trips() {
        let ts = Timespan::new(4, TimeUnit::Hour);
        assert_eq!(ts.to_string(), "4 Hours");
        assert_eq!(ts.to_string().parse::<Timespan>(), Ok(ts));
    }
}
