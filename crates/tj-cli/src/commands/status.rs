//! Status command for showing where the current moment falls in today's schedule.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDateTime;
use tj_core::SlotPosition;
use tj_core::time::{format_time, format_time_range};
use tj_db::Database;

use super::util::percent;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    database_path: &Path,
    now: NaiveDateTime,
) -> Result<()> {
    let prefs = db.load_preferences()?;
    let schedule = prefs.schedule();
    let today = now.date();
    let entries = db.entries_for_date(today)?;
    let slots = schedule.generate_slots(&entries);
    let filled = slots.iter().filter(|slot| slot.is_filled()).count();

    writeln!(writer, "Time journal status")?;
    writeln!(writer, "Database: {}", database_path.display())?;

    if slots.is_empty() {
        writeln!(writer, "Schedule: no slots configured.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "Today: {filled} of {} slots filled ({}%)",
        slots.len(),
        percent(filled, slots.len())
    )?;

    let active = schedule.active_slot(now.time());
    match active.index_within(slots.len()) {
        Some(index) => {
            let slot = &slots[index];
            let state = if slot.is_filled() { "logged" } else { "open" };
            writeln!(
                writer,
                "Current slot: {} ({state})",
                format_time_range(slot.start_time, slot.end_time)
            )?;
        }
        None if active == SlotPosition::BeforeStart => writeln!(
            writer,
            "Current slot: none, day starts at {}",
            format_time(schedule.wake_time)
        )?,
        None => writeln!(writer, "Current slot: none, day is over")?,
    }

    match schedule.next_boundary(now.time()) {
        Some(next) => writeln!(writer, "Next check-in: {}", format_time(next))?,
        None => writeln!(writer, "Next check-in: none today")?,
    }

    let pending = db.list_reminders()?.len();
    let due = db.due_reminders(now)?.len();
    writeln!(writer, "Reminders: {pending} pending, {due} due")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, NaiveTime};
    use insta::assert_snapshot;
    use tj_core::{JournalEntry, UserPreferences, reschedule_reminders};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap().and_time(t(h, m))
    }

    fn render(db: &Database, path: &Path, now: NaiveDateTime) -> String {
        let mut output = Vec::new();
        run(&mut output, db, path, now).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn status_during_the_day() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("tj.db");
        let mut db = Database::open(&db_path).unwrap();
        db.upsert_entry(&JournalEntry {
            description: "planning".to_string(),
            ..JournalEntry::new(at(0, 0).date(), t(9, 0), t(11, 0))
        })
        .unwrap();
        reschedule_reminders(&mut db, &UserPreferences::default(), at(0, 0).date(), t(6, 0))
            .unwrap();

        let output = render(&db, &db_path, at(10, 30));
        let output = output.replace(&db_path.display().to_string(), "[TEMP]/tj.db");
        assert_snapshot!(output, @r"
Time journal status
Database: [TEMP]/tj.db
Today: 1 of 8 slots filled (12%)
Current slot: 9:00 AM - 11:00 AM (logged)
Next check-in: 11:00 AM
Reminders: 8 pending, 1 due
");
    }

    #[test]
    fn status_before_wake_and_after_sleep() {
        let db = Database::open_in_memory().unwrap();
        let path = Path::new("memory");

        let early = render(&db, path, at(5, 0));
        assert!(early.contains("Current slot: none, day starts at 7:00 AM"));
        assert!(early.contains("Next check-in: 9:00 AM"));

        let late = render(&db, path, at(23, 30));
        assert!(late.contains("Current slot: none, day is over"));
        assert!(late.contains("Next check-in: none today"));
    }

    #[test]
    fn status_with_empty_schedule() {
        let mut db = Database::open_in_memory().unwrap();
        db.update_preferences(|prefs| UserPreferences {
            interval_minutes: 0,
            ..prefs
        })
        .unwrap();

        let output = render(&db, Path::new("memory"), at(10, 0));
        assert!(output.ends_with("Schedule: no slots configured.\n"));
    }
}
