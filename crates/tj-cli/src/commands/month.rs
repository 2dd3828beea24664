//! Month command: entry totals, completion and mood/activity frequencies.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use tj_core::{Frequency, MonthInsight};
use tj_db::Database;

use super::util::month_bounds;

pub fn run<W: Write>(writer: &mut W, db: &Database, year: i32, month: u32, json: bool) -> Result<()> {
    let (first, last) = month_bounds(year, month)?;
    let prefs = db.load_preferences()?;
    let entries = db.entries_for_range(first, last)?;
    let insight = MonthInsight::aggregate(year, month, &entries, prefs.total_slots());
    tracing::debug!(year, month, entries = entries.len(), "month insight");

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&insight)?)?;
        return Ok(());
    }

    writeln!(writer, "{}", first.format("%B %Y"))?;
    if insight.total_entries == 0 {
        writeln!(writer, "No entries this month.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "Entries: {} across {} {}",
        insight.total_entries,
        insight.active_days,
        if insight.active_days == 1 { "day" } else { "days" }
    )?;
    writeln!(
        writer,
        "Average completion: {:.0}%",
        insight.average_completion_rate * 100.0
    )?;
    if let Some(tag) = insight.top_activity() {
        writeln!(writer, "Top activity: {tag}")?;
    }
    if let Some(mood) = insight.dominant_mood() {
        writeln!(writer, "Dominant mood: {mood}")?;
    }

    write_frequencies(writer, "Activities", &insight.tag_frequency)?;
    write_frequencies(writer, "Moods", &insight.mood_frequency)?;

    let days: Vec<String> = insight
        .days_with_entries
        .iter()
        .map(ToString::to_string)
        .collect();
    writeln!(writer)?;
    writeln!(writer, "Days with entries: {}", days.join(", "))?;
    Ok(())
}

fn write_frequencies<W: Write, T: Display>(
    writer: &mut W,
    heading: &str,
    frequencies: &[Frequency<T>],
) -> Result<()> {
    if frequencies.is_empty() {
        return Ok(());
    }
    writeln!(writer)?;
    writeln!(writer, "{heading}:")?;
    for frequency in frequencies {
        let label = frequency.value.to_string();
        writeln!(writer, "  {label:<14}{}", frequency.count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, NaiveTime};
    use insta::assert_snapshot;
    use tj_core::{ActivityTag, JournalEntry, Mood};

    fn entry(month: u32, day: u32, hour: u32, mood: Option<Mood>, tags: &[ActivityTag]) -> JournalEntry {
        let date = NaiveDate::from_ymd_opt(2026, month, day).unwrap();
        let start = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(hour + 2, 0, 0).unwrap();
        JournalEntry {
            mood,
            tags: tags.to_vec(),
            ..JournalEntry::new(date, start, end)
        }
    }

    fn seeded_db() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        for entry in [
            entry(3, 2, 7, Some(Mood::Focused), &[ActivityTag::Work, ActivityTag::Learning]),
            entry(3, 2, 9, None, &[ActivityTag::Work]),
            entry(3, 5, 7, Some(Mood::Tired), &[ActivityTag::Exercise]),
            entry(4, 1, 7, Some(Mood::Happy), &[ActivityTag::Social]),
        ] {
            db.upsert_entry(&entry).unwrap();
        }
        db
    }

    #[test]
    fn month_summary_text() {
        let db = seeded_db();
        let mut output = Vec::new();
        run(&mut output, &db, 2026, 3, false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
March 2026
Entries: 3 across 2 days
Average completion: 19%
Top activity: Work
Dominant mood: Focused

Activities:
  Work          2
  Exercise      1
  Learning      1

Moods:
  Focused       1
  Tired         1

Days with entries: 2, 5
");
    }

    #[test]
    fn empty_month() {
        let db = seeded_db();
        let mut output = Vec::new();
        run(&mut output, &db, 2026, 2, false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
February 2026
No entries this month.
");
    }

    #[test]
    fn month_summary_json() {
        let db = seeded_db();
        let mut output = Vec::new();
        run(&mut output, &db, 2026, 4, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["total_entries"], 1);
        assert_eq!(value["days_with_entries"], serde_json::json!([1]));
        assert_eq!(value["mood_frequency"][0]["value"], "happy");
        assert_eq!(value["tag_frequency"][0]["value"], "Social");
    }

    #[test]
    fn invalid_month_is_an_error() {
        let db = seeded_db();
        let mut output = Vec::new();
        assert!(run(&mut output, &db, 2026, 13, false).is_err());
    }
}
