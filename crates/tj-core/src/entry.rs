//! Journal entries recorded against time slots.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::SlotEntry;
use crate::time::minutes_between;
use crate::types::{ActivityTag, Mood};

/// A single reflection recorded for one slot of one day.
///
/// `(date, start_time)` is unique in storage. An `id` of 0 means the entry has
/// not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(default)]
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ActivityTag>,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Creates an unsaved, empty entry for a slot.
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id: 0,
            date,
            start_time,
            end_time,
            description: String::new(),
            mood: None,
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether the user provided any content at all.
    pub fn has_content(&self) -> bool {
        !self.description.trim().is_empty() || self.mood.is_some() || !self.tags.is_empty()
    }

    /// Slot duration in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        minutes_between(self.start_time, self.end_time)
    }
}

impl SlotEntry for JournalEntry {
    fn start_time(&self) -> NaiveTime {
        self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> JournalEntry {
        JournalEntry::new(
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        )
    }

    #[test]
    fn new_entry_is_unsaved_and_empty() {
        let entry = entry();
        assert_eq!(entry.id, 0);
        assert!(!entry.has_content());
        assert_eq!(entry.duration_minutes(), 120);
    }

    #[test]
    fn blank_description_is_not_content() {
        let mut entry = entry();
        entry.description = "   ".to_string();
        assert!(!entry.has_content());
        entry.tags.push(ActivityTag::Work);
        assert!(entry.has_content());
    }

    #[test]
    fn mood_alone_counts_as_content() {
        let mut entry = entry();
        entry.mood = Some(Mood::Calm);
        assert!(entry.has_content());
    }

    #[test]
    fn serde_roundtrip_keeps_payload() {
        let mut entry = entry();
        entry.id = 7;
        entry.description = "standup".to_string();
        entry.mood = Some(Mood::Focused);
        entry.tags = vec![ActivityTag::Work, ActivityTag::SelfCare];

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: JournalEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn serde_omits_empty_optional_fields() {
        let json = serde_json::to_value(entry()).unwrap();
        assert!(json.get("mood").is_none());
        assert!(json.get("tags").is_none());
        assert_eq!(json["start_time"], "09:00:00");
    }
}
