//! Time-of-day arithmetic and formatting shared by the engine and its callers.
//!
//! All arithmetic is in whole minutes within a single calendar day. Nothing here
//! wraps past midnight: [`offset_time`] returns `None` instead.

use chrono::{NaiveTime, Timelike};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Whole minutes from `from` to `to`, negative if `to` is earlier.
///
/// Seconds are truncated toward zero, matching the minute granularity of slots.
pub fn minutes_between(from: NaiveTime, to: NaiveTime) -> i64 {
    (to - from).num_minutes()
}

/// Returns `base + minutes`, or `None` if the result leaves the day.
pub fn offset_time(base: NaiveTime, minutes: i64) -> Option<NaiveTime> {
    let base_minutes = i64::from(base.num_seconds_from_midnight()) / 60;
    let target = base_minutes.checked_add(minutes)?;
    if !(0..MINUTES_PER_DAY).contains(&target) {
        return None;
    }
    let seconds = u32::try_from(target * 60).ok()? + base.second();
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, base.nanosecond())
}

/// Drops seconds and sub-second precision, leaving the start of the minute.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    let seconds = time.num_seconds_from_midnight();
    NaiveTime::from_num_seconds_from_midnight_opt(seconds - seconds % 60, 0).unwrap_or(time)
}

/// Formats a time as a 12-hour clock label, e.g. `9:00 AM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Formats a slot range, e.g. `9:00 AM - 11:00 AM`.
pub fn format_time_range(start: NaiveTime, end: NaiveTime) -> String {
    format!("{} - {}", format_time(start), format_time(end))
}

/// Formats an interval length for display: `30min`, `2h`, `1h 30min`.
pub fn format_interval_label(minutes: i64) -> String {
    if minutes < 60 {
        format!("{minutes}min")
    } else if minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}h {}min", minutes / 60, minutes % 60)
    }
}

/// Parses a 24-hour time of day: `09:00`, `9:00`, or `21:30:00`.
///
/// Seconds are accepted but dropped.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
        .map(truncate_to_minute)
}
