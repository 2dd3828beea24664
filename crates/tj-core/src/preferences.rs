//! User schedule and reminder preferences.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::interval::DaySchedule;

/// Suggested slot widths, in minutes. Any positive value is accepted.
pub const INTERVAL_OPTIONS: [i64; 6] = [30, 60, 90, 120, 180, 240];

/// Schedule and reminder settings.
///
/// Defaults match a typical day: awake 7 AM to 11 PM with 2-hour check-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub wake_time: NaiveTime,
    pub sleep_time: NaiveTime,
    pub interval_minutes: i64,
    pub notifications_enabled: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            wake_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default(),
            sleep_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap_or_default(),
            interval_minutes: 120,
            notifications_enabled: true,
        }
    }
}

impl UserPreferences {
    /// The day schedule these preferences describe.
    pub fn schedule(&self) -> DaySchedule {
        DaySchedule::new(self.wake_time, self.sleep_time, self.interval_minutes)
    }

    /// Minutes between wake and sleep, zero if the schedule is empty.
    pub fn waking_minutes(&self) -> i64 {
        self.schedule().span_minutes()
    }

    /// Number of check-in slots in a day.
    pub fn total_slots(&self) -> usize {
        self.schedule().slot_count()
    }
}
