use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub struct TimeUtils;

impl TimeUtils {
    pub const SECS_IN_MIN: i64 = 60;
    pub const SECS_IN_D: i64 = Self::SECS_IN_MIN * 60 * 24;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
    pub const STANDARD_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Local wall-clock time, second precision (the resolution samples are stored at)
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Fractional days from `from` to `to` (negative if `to` is earlier)
pub fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / TimeUtils::SECS_IN_D as f64
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// `date` with the time of day taken from `clock`
pub fn date_at_time_of(date: NaiveDate, clock: NaiveDateTime) -> NaiveDateTime {
    date.and_time(clock.time())
}

pub fn format_date(ts: NaiveDateTime) -> String {
    ts.format(TimeUtils::STANDARD_TIME_FORMAT).to_string()
}

pub fn format_datetime(ts: NaiveDateTime) -> String {
    ts.format(TimeUtils::STANDARD_DATETIME_FORMAT).to_string()
}

/// Human readable "3m 20s" style duration, clamped at zero
pub fn describe_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (mins, secs) = (total / TimeUtils::SECS_IN_MIN, total % TimeUtils::SECS_IN_MIN);
    if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
