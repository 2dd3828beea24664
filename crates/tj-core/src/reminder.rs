//! Reminder planning for the remaining slot boundaries of a day.
//!
//! Reminders fire at the end of each slot and ask how the slot went. They are
//! derived from the same slot list the day view renders, so a reminder never
//! refers to a slot the user cannot see.
//!
//! Each reminder is keyed by its ordinal among the day's remaining slots. Keys
//! are bounded by [`MAX_REMINDERS`]; rescheduling clears every key in that
//! range before registering new ones so no stale reminder survives a change of
//! schedule.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::entry::JournalEntry;
use crate::preferences::UserPreferences;
use crate::time::format_time_range;

/// Upper bound on concurrently scheduled reminders.
pub const MAX_REMINDERS: usize = 24;

/// Title shown with every reminder.
pub const REMINDER_TITLE: &str = "Time to reflect";

/// A pending prompt to journal a finished slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Slot offset among today's remaining slots, in `0..MAX_REMINDERS`.
    pub key: u32,
    pub date: NaiveDate,
    pub slot_start: NaiveTime,
    pub slot_end: NaiveTime,
    pub fire_at: NaiveDateTime,
}

impl Reminder {
    /// Body text, e.g. `How was 9:00 AM - 11:00 AM?`.
    pub fn message(&self) -> String {
        format!("How was {}?", format_time_range(self.slot_start, self.slot_end))
    }

    /// Whether the reminder should have fired by `now`.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.fire_at <= now
    }
}

/// Destination for scheduled reminders (a database table, an OS timer, ...).
pub trait ReminderSink {
    type Error;

    /// Removes the reminder registered under `key`, if any.
    fn clear_reminder(&mut self, key: u32) -> Result<(), Self::Error>;

    /// Registers `reminder`, replacing whatever was stored under its key.
    fn register_reminder(&mut self, reminder: &Reminder) -> Result<(), Self::Error>;
}

/// Plans one reminder per slot of `date` that ends after `now`.
///
/// Slots come from the interval engine with no entries attached. At most
/// [`MAX_REMINDERS`] are returned.
pub fn plan_reminders(prefs: &UserPreferences, date: NaiveDate, now: NaiveTime) -> Vec<Reminder> {
    let slots = prefs.schedule().generate_slots::<JournalEntry>(&[]);
    slots
        .iter()
        .filter(|slot| slot.end_time > now)
        .take(MAX_REMINDERS)
        .zip(0u32..)
        .map(|(slot, key)| Reminder {
            key,
            date,
            slot_start: slot.start_time,
            slot_end: slot.end_time,
            fire_at: date.and_time(slot.end_time),
        })
        .collect()
}

/// Clears every reminder key, then registers today's plan if notifications are on.
///
/// Returns the number of reminders registered.
pub fn reschedule_reminders<S: ReminderSink>(
    sink: &mut S,
    prefs: &UserPreferences,
    date: NaiveDate,
    now: NaiveTime,
) -> Result<usize, S::Error> {
    for key in (0u32..).take(MAX_REMINDERS) {
        sink.clear_reminder(key)?;
    }

    if !prefs.notifications_enabled {
        tracing::debug!("notifications disabled, reminders cleared");
        return Ok(0);
    }

    let reminders = plan_reminders(prefs, date, now);
    for reminder in &reminders {
        sink.register_reminder(reminder)?;
    }
    tracing::debug!(count = reminders.len(), %date, "reminders scheduled");
    Ok(reminders.len())
}
