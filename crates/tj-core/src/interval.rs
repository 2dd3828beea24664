//! Interval engine: slot generation and entry matching for a single day.
//!
//! Every operation derives from the same boundary rule: slot `i` spans
//! `[wake + i*interval, min(wake + (i+1)*interval, sleep))`. The UI, reminder
//! planning and the status line all go through this module so the boundaries
//! they see are identical.
//!
//! # Complexity
//!
//! - [`generate_slots`]: O(S + E log E) for S slots and E entries
//! - [`locate_active_slot`]: O(1)
//! - [`predict_next_boundary`]: O(1)
//!
//! # Algorithm (`generate_slots`)
//!
//! 1. Compute the slot count from the span and interval.
//! 2. Sort entries by start time (skipped for zero or one entry).
//! 3. Walk slots and entries together with two cursors, attaching an entry
//!    to the slot whose start time it equals.
//!
//! Degenerate schedules (non-positive interval, `wake >= sleep`) produce no
//! slots and never loop. Schedules crossing midnight are not representable.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::time::{minutes_between, offset_time, truncate_to_minute};

/// Anything that can be matched against a slot boundary.
///
/// The engine only ever looks at the start time; the rest of the payload is
/// opaque to it.
pub trait SlotEntry {
    /// Returns the time of day this entry was recorded against.
    fn start_time(&self) -> NaiveTime;
}

/// Wake/sleep boundary and slot width for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DaySchedule {
    pub wake_time: NaiveTime,
    pub sleep_time: NaiveTime,
    pub interval_minutes: i64,
}

/// A slot in a day's schedule, optionally carrying the entry recorded for it.
#[derive(Debug, PartialEq, Eq)]
pub struct TimeSlot<'a, E> {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub entry: Option<&'a E>,
}

// Manual impls: a derive would require `E: Clone`/`E: Copy`.
impl<E> Clone for TimeSlot<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for TimeSlot<'_, E> {}

impl<E> TimeSlot<'_, E> {
    /// Whether an entry was matched to this slot.
    pub const fn is_filled(&self) -> bool {
        self.entry.is_some()
    }

    /// Slot length in whole minutes. Shorter than the interval for a partial last slot.
    pub fn duration_minutes(&self) -> i64 {
        minutes_between(self.start_time, self.end_time)
    }

    /// Whether `time` falls inside `[start_time, end_time)`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start_time <= time && time < self.end_time
    }
}

/// Position of an instant relative to a day's slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum SlotPosition {
    /// The day has not started yet, or the schedule has no usable interval.
    BeforeStart,
    /// Zero-based ordinal of the slot containing the instant.
    ///
    /// Not bounded by the day's end; callers check it against their slot list.
    At(usize),
}

impl SlotPosition {
    /// Returns the slot index, if any.
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::BeforeStart => None,
            Self::At(index) => Some(index),
        }
    }

    /// Returns the index only if it addresses one of `slot_count` slots.
    pub fn index_within(self, slot_count: usize) -> Option<usize> {
        self.index().filter(|&index| index < slot_count)
    }
}

impl DaySchedule {
    /// Creates a schedule. Degenerate values are allowed and yield no slots.
    ///
    /// Both boundaries are truncated to whole minutes, so the last slot always
    /// ends exactly at `sleep_time`.
    pub fn new(wake_time: NaiveTime, sleep_time: NaiveTime, interval_minutes: i64) -> Self {
        Self {
            wake_time: truncate_to_minute(wake_time),
            sleep_time: truncate_to_minute(sleep_time),
            interval_minutes,
        }
    }

    /// Whether this schedule produces zero slots.
    pub fn is_empty(&self) -> bool {
        self.interval_minutes <= 0 || minutes_between(self.wake_time, self.sleep_time) <= 0
    }

    /// Minutes from wake to sleep. Zero for an empty schedule.
    pub fn span_minutes(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        minutes_between(self.wake_time, self.sleep_time)
    }

    /// Number of slots: `ceil(span / interval)`, or zero for an empty schedule.
    pub fn slot_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let span = self.span_minutes();
        let count = span / self.interval_minutes + i64::from(span % self.interval_minutes > 0);
        usize::try_from(count).unwrap_or(0)
    }

    /// Start and end of slot `index`, or `None` past the last slot.
    pub fn slot_bounds(&self, index: usize) -> Option<(NaiveTime, NaiveTime)> {
        if index >= self.slot_count() {
            return None;
        }
        let offset = i64::try_from(index).ok()? * self.interval_minutes;
        let start = offset_time(self.wake_time, offset)?;
        let end = offset_time(start, self.interval_minutes)
            .map_or(self.sleep_time, |end| end.min(self.sleep_time));
        Some((start, end))
    }

    /// Iterates over every slot's `(start, end)` in ascending order.
    pub fn boundaries(&self) -> impl Iterator<Item = (NaiveTime, NaiveTime)> + '_ {
        (0..self.slot_count()).map_while(|index| self.slot_bounds(index))
    }

    /// See [`generate_slots`].
    pub fn generate_slots<'a, E: SlotEntry>(&self, entries: &'a [E]) -> Vec<TimeSlot<'a, E>> {
        let count = self.slot_count();
        let mut slots = Vec::with_capacity(count);
        if count == 0 {
            return slots;
        }

        let mut sorted: Vec<&'a E> = entries.iter().collect();
        if sorted.len() > 1 {
            sorted.sort_by_key(|entry| entry.start_time());
        }

        let mut next_entry = 0;
        for (start, end) in self.boundaries() {
            let mut matched = None;
            while let Some(&entry) = sorted.get(next_entry) {
                let entry_start = entry.start_time();
                if entry_start > start {
                    break;
                }
                // Stale entries (before the cursor) are consumed without a match;
                // duplicates at the boundary leave the last one attached.
                if entry_start == start {
                    matched = Some(entry);
                }
                next_entry += 1;
            }
            slots.push(TimeSlot {
                start_time: start,
                end_time: end,
                entry: matched,
            });
        }

        slots
    }

    /// See [`locate_active_slot`].
    pub fn active_slot(&self, now: NaiveTime) -> SlotPosition {
        locate_active_slot(self.wake_time, self.interval_minutes, now)
    }

    /// See [`predict_next_boundary`].
    pub fn next_boundary(&self, now: NaiveTime) -> Option<NaiveTime> {
        predict_next_boundary(self.wake_time, self.sleep_time, self.interval_minutes, now)
    }
}

/// Builds the ordered slot list for `[wake_time, sleep_time)` and attaches entries.
///
/// An entry is attached to the slot whose start time it equals exactly. Entries
/// that match no boundary (stale interval settings, at or after `sleep_time`)
/// are dropped silently. The returned slots borrow from `entries`.
pub fn generate_slots<E: SlotEntry>(
    wake_time: NaiveTime,
    sleep_time: NaiveTime,
    interval_minutes: i64,
    entries: &[E],
) -> Vec<TimeSlot<'_, E>> {
    DaySchedule::new(wake_time, sleep_time, interval_minutes).generate_slots(entries)
}

/// Returns the slot index containing `now`.
///
/// [`SlotPosition::BeforeStart`] if `now` precedes `wake_time` or the interval is
/// not positive. The index is not checked against the end of the day.
pub fn locate_active_slot(wake_time: NaiveTime, interval_minutes: i64, now: NaiveTime) -> SlotPosition {
    if now < wake_time || interval_minutes <= 0 {
        return SlotPosition::BeforeStart;
    }
    let elapsed = minutes_between(wake_time, now);
    usize::try_from(elapsed / interval_minutes).map_or(SlotPosition::BeforeStart, SlotPosition::At)
}

/// Returns the next slot boundary strictly after `now`.
///
/// `None` once `now` reaches `sleep_time`, for a non-positive interval, or when
/// the next boundary would land on or after `sleep_time`. The result is never
/// clamped to `sleep_time`.
pub fn predict_next_boundary(
    wake_time: NaiveTime,
    sleep_time: NaiveTime,
    interval_minutes: i64,
    now: NaiveTime,
) -> Option<NaiveTime> {
    if now >= sleep_time || interval_minutes <= 0 {
        return None;
    }

    let reference = now.max(wake_time);
    let elapsed = minutes_between(wake_time, reference);
    let next_offset = (elapsed / interval_minutes + 1).checked_mul(interval_minutes)?;
    if next_offset >= minutes_between(wake_time, sleep_time) {
        return None;
    }
    offset_time(wake_time, next_offset)
}
