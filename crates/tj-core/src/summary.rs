//! Day and month aggregates derived from slots and entries.
//!
//! Both aggregations are single passes. Frequency ties are broken by the
//! enum's declaration order so output is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::entry::JournalEntry;
use crate::interval::TimeSlot;
use crate::types::{ActivityTag, Mood};

/// Number of tags reported in [`DaySummary::top_tags`].
const TOP_TAG_COUNT: usize = 3;

/// How often a mood or tag occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frequency<T> {
    pub value: T,
    pub count: usize,
}

/// Aggregated view of one day's slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_slots: usize,
    pub filled_slots: usize,
    pub dominant_mood: Option<Mood>,
    pub top_tags: Vec<ActivityTag>,
    pub completion_rate: f32,
}

impl DaySummary {
    /// Summarizes the slots generated for `date`.
    pub fn from_slots(date: NaiveDate, slots: &[TimeSlot<'_, JournalEntry>]) -> Self {
        let mut moods: BTreeMap<Mood, usize> = BTreeMap::new();
        let mut tags: BTreeMap<ActivityTag, usize> = BTreeMap::new();
        let mut filled_slots = 0;

        for entry in slots.iter().filter_map(|slot| slot.entry) {
            filled_slots += 1;
            if let Some(mood) = entry.mood {
                *moods.entry(mood).or_default() += 1;
            }
            for tag in &entry.tags {
                *tags.entry(*tag).or_default() += 1;
            }
        }

        Self {
            date,
            total_slots: slots.len(),
            filled_slots,
            dominant_mood: by_count(moods).first().map(|f| f.value),
            top_tags: by_count(tags)
                .into_iter()
                .take(TOP_TAG_COUNT)
                .map(|f| f.value)
                .collect(),
            completion_rate: ratio(filled_slots, slots.len()),
        }
    }
}

/// Monthly statistics over all entries recorded within one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthInsight {
    pub year: i32,
    pub month: u32,
    pub total_entries: usize,
    pub active_days: usize,
    pub tag_frequency: Vec<Frequency<ActivityTag>>,
    pub mood_frequency: Vec<Frequency<Mood>>,
    pub days_with_entries: BTreeSet<u32>,
    pub average_completion_rate: f32,
}

impl MonthInsight {
    /// Aggregates `entries` (all within the month) against `slots_per_day`.
    ///
    /// Completion is `entries / (active_days * slots_per_day)`, with
    /// `slots_per_day` floored at one so an empty schedule cannot divide by zero.
    pub fn aggregate(year: i32, month: u32, entries: &[JournalEntry], slots_per_day: usize) -> Self {
        let mut tags: BTreeMap<ActivityTag, usize> = BTreeMap::new();
        let mut moods: BTreeMap<Mood, usize> = BTreeMap::new();
        let mut days = BTreeSet::new();

        for entry in entries {
            days.insert(entry.date.day());
            if let Some(mood) = entry.mood {
                *moods.entry(mood).or_default() += 1;
            }
            for tag in &entry.tags {
                *tags.entry(*tag).or_default() += 1;
            }
        }

        let total_slots = days.len() * slots_per_day.max(1);

        Self {
            year,
            month,
            total_entries: entries.len(),
            active_days: days.len(),
            tag_frequency: by_count(tags),
            mood_frequency: by_count(moods),
            average_completion_rate: ratio(entries.len(), total_slots),
            days_with_entries: days,
        }
    }

    /// The most frequent activity, if any entry was tagged.
    pub fn top_activity(&self) -> Option<ActivityTag> {
        self.tag_frequency.first().map(|f| f.value)
    }

    /// The most frequent mood, if any entry had one.
    pub fn dominant_mood(&self) -> Option<Mood> {
        self.mood_frequency.first().map(|f| f.value)
    }
}

/// Sorts counts descending; the stable sort keeps key order among ties.
fn by_count<T: Copy + Ord>(counts: BTreeMap<T, usize>) -> Vec<Frequency<T>> {
    let mut frequencies: Vec<_> = counts
        .into_iter()
        .map(|(value, count)| Frequency { value, count })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));
    frequencies
}

#[expect(
    clippy::cast_precision_loss,
    reason = "slot and entry counts are far below f32 precision limits"
)]
fn ratio(numerator: usize, denominator: usize) -> f32 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f32 / denominator as f32
}
