//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use regex::Regex;
use tj_core::ActivityTag;
use tj_core::time::parse_time_of_day;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative dates (~1000 years in days).
const MAX_RELATIVE_DAYS: u64 = 1000 * 365;

/// Parse a date string relative to `today`.
///
/// Supports:
/// - ISO 8601: "2026-03-02"
/// - Keywords: "today", "yesterday", "tomorrow"
/// - Relative: "3 days ago", "1 week ago"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim().to_lowercase();

    if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Ok(date);
    }

    let shifted = match s.as_str() {
        "today" => Some(today),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        _ => {
            let Some(caps) = RELATIVE_DATE_RE.captures(&s) else {
                anyhow::bail!(
                    "Invalid date: {s}. Use YYYY-MM-DD, today, yesterday, tomorrow or relative (e.g., '3 days ago')"
                );
            };

            let n: u64 = caps[1]
                .parse()
                .context("failed to parse number in relative date")?;
            let days_per_unit = if &caps[2] == "week" { 7 } else { 1 };
            let days = n.saturating_mul(days_per_unit);
            if days > MAX_RELATIVE_DAYS {
                anyhow::bail!("Relative date too far back: {n} {}", &caps[2]);
            }
            today.checked_sub_days(Days::new(days))
        }
    };

    shifted.with_context(|| format!("date out of range: {s}"))
}

/// Parse a `YYYY-MM` month into `(year, month)`.
pub fn parse_month(s: &str) -> anyhow::Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month: {s}. Use YYYY-MM (e.g., 2026-03)"))?;
    Ok((first.year(), first.month()))
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("invalid month: {year}-{month:02}"))?;
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .with_context(|| format!("month out of range: {year}-{month:02}"))?;
    let last = next
        .pred_opt()
        .with_context(|| format!("month out of range: {year}-{month:02}"))?;
    Ok((first, last))
}

/// Parse a time of day: 24-hour `HH:MM` / `HH:MM:SS`, or 12-hour `9:00 AM`.
pub fn parse_time(s: &str) -> anyhow::Result<NaiveTime> {
    if let Some(time) = parse_time_of_day(s) {
        return Ok(time);
    }
    let upper = s.trim().to_uppercase();
    NaiveTime::parse_from_str(&upper, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(&upper, "%I:%M%p"))
        .with_context(|| format!("Invalid time: {s}. Use HH:MM (e.g., 09:00) or 9:00 AM"))
}

/// Integer percentage of `part` in `whole`, zero when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> usize {
    if whole == 0 { 0 } else { part * 100 / whole }
}

/// Comma-separated tag labels.
pub fn tag_list(tags: &[ActivityTag]) -> String {
    tags.iter()
        .map(|tag| tag.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_and_keywords() {
        assert_eq!(parse_date("2026-01-15", today()).unwrap(), date(2026, 1, 15));
        assert_eq!(parse_date("today", today()).unwrap(), today());
        assert_eq!(parse_date("Yesterday", today()).unwrap(), date(2026, 3, 1));
        assert_eq!(parse_date("tomorrow", today()).unwrap(), date(2026, 3, 3));
    }

    #[test]
    fn parses_relative_dates() {
        assert_eq!(parse_date("3 days ago", today()).unwrap(), date(2026, 2, 27));
        assert_eq!(parse_date("1 day ago", today()).unwrap(), date(2026, 3, 1));
        assert_eq!(parse_date("2 weeks ago", today()).unwrap(), date(2026, 2, 16));
    }

    #[test]
    fn rejects_bad_dates() {
        let err = parse_date("last tuesday", today()).unwrap_err();
        assert!(err.to_string().contains("Invalid date"));

        let err = parse_date("999999999 days ago", today()).unwrap_err();
        assert!(err.to_string().contains("too far back"));
    }

    #[test]
    fn parses_months() {
        assert_eq!(parse_month("2026-03").unwrap(), (2026, 3));
        assert!(parse_month("2026-13").is_err());
        assert!(parse_month("March").is_err());
    }

    #[test]
    fn month_bounds_handle_lengths() {
        assert_eq!(
            month_bounds(2024, 2).unwrap(),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            month_bounds(2026, 12).unwrap(),
            (date(2026, 12, 1), date(2026, 12, 31))
        );
    }

    #[test]
    fn parses_times() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let nine_pm = NaiveTime::from_hms_opt(21, 0, 0).unwrap();
        assert_eq!(parse_time("09:00").unwrap(), nine);
        assert_eq!(parse_time("9:00 am").unwrap(), nine);
        assert_eq!(parse_time("9:00PM").unwrap(), nine_pm);
        assert!(parse_time("nine").is_err());
    }

    #[test]
    fn percent_floors_and_guards_zero() {
        assert_eq!(percent(3, 8), 37);
        assert_eq!(percent(8, 8), 100);
        assert_eq!(percent(1, 0), 0);
    }
}
