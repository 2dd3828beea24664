//! Preferences commands: show the schedule settings or change them.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::NaiveDateTime;
use clap::{Args, ValueEnum};
use tj_core::time::{format_interval_label, format_time};
use tj_core::{INTERVAL_OPTIONS, UserPreferences, reschedule_reminders};
use tj_db::Database;

use super::util::parse_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Args)]
pub struct PrefsSetArgs {
    /// Wake time (e.g. 07:00).
    #[arg(long)]
    pub wake: Option<String>,

    /// Sleep time (e.g. 23:00).
    #[arg(long)]
    pub sleep: Option<String>,

    /// Slot length in minutes (usually one of 30, 60, 90, 120, 180, 240).
    #[arg(long, allow_negative_numbers = true)]
    pub interval: Option<i64>,

    /// Turn check-in reminders on or off.
    #[arg(long, value_enum)]
    pub notifications: Option<Toggle>,
}

impl PrefsSetArgs {
    const fn is_empty(&self) -> bool {
        self.wake.is_none()
            && self.sleep.is_none()
            && self.interval.is_none()
            && self.notifications.is_none()
    }
}

pub fn show<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let prefs = db.load_preferences()?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&prefs)?)?;
        return Ok(());
    }
    write_prefs(writer, &prefs)
}

/// Applies the given changes, then reschedules today's reminders.
pub fn set<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &PrefsSetArgs,
    now: NaiveDateTime,
) -> Result<()> {
    if args.is_empty() {
        bail!("nothing to update; pass --wake, --sleep, --interval or --notifications");
    }

    let wake = args.wake.as_deref().map(parse_time).transpose()?;
    let sleep = args.sleep.as_deref().map(parse_time).transpose()?;

    let prefs = db.update_preferences(|prefs| UserPreferences {
        wake_time: wake.unwrap_or(prefs.wake_time),
        sleep_time: sleep.unwrap_or(prefs.sleep_time),
        interval_minutes: args.interval.unwrap_or(prefs.interval_minutes),
        notifications_enabled: args
            .notifications
            .map_or(prefs.notifications_enabled, |toggle| toggle == Toggle::On),
    })?;

    if !INTERVAL_OPTIONS.contains(&prefs.interval_minutes) {
        tracing::warn!(interval = prefs.interval_minutes, "interval is not a standard option");
    }
    if prefs.schedule().is_empty() {
        tracing::warn!(?prefs, "schedule produces no slots");
        writeln!(
            writer,
            "Warning: this schedule has no slots (wake must be before sleep and the interval positive)."
        )?;
    }

    write_prefs(writer, &prefs)?;

    let scheduled = reschedule_reminders(db, &prefs, now.date(), now.time())?;
    writeln!(writer, "Scheduled {scheduled} reminders for today.")?;
    Ok(())
}

fn write_prefs<W: Write>(writer: &mut W, prefs: &UserPreferences) -> Result<()> {
    writeln!(writer, "Wake time:      {}", format_time(prefs.wake_time))?;
    writeln!(writer, "Sleep time:     {}", format_time(prefs.sleep_time))?;
    writeln!(
        writer,
        "Interval:       {}",
        format_interval_label(prefs.interval_minutes)
    )?;
    writeln!(
        writer,
        "Notifications:  {}",
        if prefs.notifications_enabled { "on" } else { "off" }
    )?;
    writeln!(writer, "Slots per day:  {}", prefs.total_slots())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, NaiveTime};
    use insta::assert_snapshot;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn no_changes() -> PrefsSetArgs {
        PrefsSetArgs {
            wake: None,
            sleep: None,
            interval: None,
            notifications: None,
        }
    }

    #[test]
    fn show_defaults() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        show(&mut output, &db, false).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
Wake time:      7:00 AM
Sleep time:     11:00 PM
Interval:       2h
Notifications:  on
Slots per day:  8
");
    }

    #[test]
    fn set_updates_and_reschedules() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        let args = PrefsSetArgs {
            wake: Some("06:30".to_string()),
            interval: Some(90),
            ..no_changes()
        };
        set(&mut output, &mut db, &args, now()).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
Wake time:      6:30 AM
Sleep time:     11:00 PM
Interval:       1h 30min
Notifications:  on
Slots per day:  11
Scheduled 8 reminders for today.
");

        let prefs = db.load_preferences().unwrap();
        assert_eq!(prefs.wake_time, NaiveTime::from_hms_opt(6, 30, 0).unwrap());
        assert_eq!(db.list_reminders().unwrap().len(), 8);
    }

    #[test]
    fn disabling_notifications_clears_reminders() {
        let mut db = Database::open_in_memory().unwrap();
        set(
            &mut Vec::new(),
            &mut db,
            &PrefsSetArgs {
                interval: Some(60),
                ..no_changes()
            },
            now(),
        )
        .unwrap();
        assert!(!db.list_reminders().unwrap().is_empty());

        let mut output = Vec::new();
        let args = PrefsSetArgs {
            notifications: Some(Toggle::Off),
            ..no_changes()
        };
        set(&mut output, &mut db, &args, now()).unwrap();

        assert!(db.list_reminders().unwrap().is_empty());
        assert!(String::from_utf8(output).unwrap().contains("Notifications:  off"));
    }

    #[test]
    fn degenerate_schedule_is_stored_with_warning() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        let args = PrefsSetArgs {
            wake: Some("23:00".to_string()),
            sleep: Some("07:00".to_string()),
            ..no_changes()
        };
        set(&mut output, &mut db, &args, now()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Warning: this schedule has no slots"));
        assert!(output.contains("Scheduled 0 reminders"));
        assert_eq!(db.load_preferences().unwrap().total_slots(), 0);
    }

    #[test]
    fn seconds_in_times_are_dropped() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        let args = PrefsSetArgs {
            wake: Some("07:00:00".to_string()),
            sleep: Some("07:00:30".to_string()),
            ..no_changes()
        };
        set(&mut output, &mut db, &args, now()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Warning: this schedule has no slots"));
        assert_eq!(
            db.load_preferences().unwrap().sleep_time,
            NaiveTime::from_hms_opt(7, 0, 0).unwrap()
        );
    }

    #[test]
    fn set_without_changes_is_an_error() {
        let mut db = Database::open_in_memory().unwrap();
        let err = set(&mut Vec::new(), &mut db, &no_changes(), now()).unwrap_err();
        assert!(err.to_string().contains("nothing to update"));
    }
}
