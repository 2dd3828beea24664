//! Reminder commands: reschedule today's check-ins and list pending ones.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use tj_core::reminder::REMINDER_TITLE;
use tj_core::time::format_time;
use tj_core::{Reminder, reschedule_reminders};
use tj_db::Database;

/// Replaces stored reminders with one per remaining slot of today.
pub fn schedule<W: Write>(writer: &mut W, db: &mut Database, now: NaiveDateTime) -> Result<()> {
    let prefs = db.load_preferences()?;
    let scheduled = reschedule_reminders(db, &prefs, now.date(), now.time())?;

    if !prefs.notifications_enabled {
        writeln!(writer, "Notifications are off; cleared pending reminders.")?;
        return Ok(());
    }

    writeln!(writer, "Scheduled {scheduled} reminders for {}.", now.date())?;
    for reminder in db.list_reminders()? {
        write_reminder(writer, &reminder)?;
    }
    Ok(())
}

/// Lists stored reminders, or only those due by `now`.
pub fn list<W: Write>(
    writer: &mut W,
    db: &Database,
    due_only: bool,
    now: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let reminders = if due_only {
        db.due_reminders(now)?
    } else {
        db.list_reminders()?
    };

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&reminders)?)?;
        return Ok(());
    }

    if reminders.is_empty() {
        let message = if due_only {
            "No reminders due."
        } else {
            "No pending reminders."
        };
        writeln!(writer, "{message}")?;
        return Ok(());
    }

    writeln!(writer, "{REMINDER_TITLE}")?;
    for reminder in &reminders {
        write_reminder(writer, reminder)?;
    }
    Ok(())
}

fn write_reminder<W: Write>(writer: &mut W, reminder: &Reminder) -> Result<()> {
    let fire_at = format!(
        "{} {}",
        reminder.fire_at.date(),
        format_time(reminder.fire_at.time())
    );
    writeln!(writer, "  {fire_at:<20}{}", reminder.message())?;
    Ok(())
}
