//! Core domain logic for the time journal.
//!
//! This crate contains the fundamental types and logic for:
//! - Interval engine: slot generation, active-slot lookup, next-boundary prediction
//! - Journal entries with mood and activity tags
//! - Day and month aggregates
//! - Reminder planning against a pluggable sink

mod entry;
pub mod interval;
mod preferences;
pub mod reminder;
mod summary;
pub mod time;
mod types;

pub use entry::JournalEntry;
pub use interval::{
    DaySchedule, SlotEntry, SlotPosition, TimeSlot, generate_slots, locate_active_slot,
    predict_next_boundary,
};
pub use preferences::{INTERVAL_OPTIONS, UserPreferences};
pub use reminder::{MAX_REMINDERS, Reminder, ReminderSink, plan_reminders, reschedule_reminders};
pub use summary::{DaySummary, Frequency, MonthInsight};
pub use types::{ActivityTag, Mood, ValidationError};
