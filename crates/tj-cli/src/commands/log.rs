//! Log and delete commands for journal entries.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{NaiveDateTime, Utc};
use clap::Args;
use tj_core::time::{format_time, format_time_range};
use tj_core::{ActivityTag, JournalEntry, Mood, ValidationError};
use tj_db::Database;

use super::util::{parse_date, parse_time};

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Slot start time (e.g. 09:00 or "9:00 AM").
    pub start: String,

    /// Date of the slot. Defaults to today.
    #[arg(long)]
    pub date: Option<String>,

    /// What happened during the slot.
    #[arg(long)]
    pub note: Option<String>,

    /// Mood name (happy, focused, ...) or emoji.
    #[arg(long)]
    pub mood: Option<String>,

    /// Activity tag; repeat for several.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

pub fn run<W: Write>(writer: &mut W, db: &mut Database, args: &LogArgs, now: NaiveDateTime) -> Result<()> {
    let date = match &args.date {
        Some(date) => parse_date(date, now.date())?,
        None => now.date(),
    };
    let start = parse_time(&args.start)?;

    let prefs = db.load_preferences()?;
    let slot = prefs
        .schedule()
        .boundaries()
        .find(|(slot_start, _)| *slot_start == start);
    let Some((start_time, end_time)) = slot else {
        let starts: Vec<String> = prefs
            .schedule()
            .boundaries()
            .map(|(slot_start, _)| format_time(slot_start))
            .collect();
        if starts.is_empty() {
            bail!("no slots configured; check `tj prefs show`");
        }
        bail!(
            "{} is not a slot start; slots begin at {}",
            format_time(start),
            starts.join(", ")
        );
    };

    let mood = args
        .mood
        .as_deref()
        .map(str::parse::<Mood>)
        .transpose()?;
    let mut tags: Vec<ActivityTag> = Vec::new();
    for raw in &args.tags {
        let tag: ActivityTag = raw.parse()?;
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    let entry = JournalEntry {
        description: args.note.as_deref().unwrap_or_default().trim().to_string(),
        mood,
        tags,
        created_at: Utc::now(),
        ..JournalEntry::new(date, start_time, end_time)
    };
    if !entry.has_content() {
        return Err(anyhow::Error::new(ValidationError::Empty { field: "entry" })
            .context("provide --note, --mood or --tag"));
    }

    let existed = db.slot_has_entry(date, start_time)?;
    let id = db.upsert_entry(&entry)?;
    writeln!(
        writer,
        "{} entry {id} for {} on {date}",
        if existed { "Updated" } else { "Saved" },
        format_time_range(start_time, end_time)
    )?;
    Ok(())
}

pub fn delete<W: Write>(writer: &mut W, db: &mut Database, id: i64) -> Result<()> {
    if !db.delete_entry(id)? {
        bail!("entry not found: {id}");
    }
    writeln!(writer, "Deleted entry {id}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, NaiveTime};
    use insta::assert_snapshot;
    use tj_core::UserPreferences;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn now() -> NaiveDateTime {
        monday().and_time(t(11, 5))
    }

    fn args(start: &str) -> LogArgs {
        LogArgs {
            start: start.to_string(),
            date: None,
            note: None,
            mood: None,
            tags: Vec::new(),
        }
    }

    fn log(db: &mut Database, args: &LogArgs) -> Result<String> {
        let mut output = Vec::new();
        run(&mut output, db, args, now())?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn log_saves_entry_for_slot() {
        let mut db = Database::open_in_memory().unwrap();
        let output = log(
            &mut db,
            &LogArgs {
                note: Some("  standup and review  ".to_string()),
                mood: Some("Focused".to_string()),
                tags: vec!["work".to_string(), "Work".to_string(), "self care".to_string()],
                ..args("9:00 AM")
            },
        )
        .unwrap();
        assert_snapshot!(output, @"Saved entry 1 for 9:00 AM - 11:00 AM on 2026-03-02");

        let entry = db.entry_by_slot(monday(), t(9, 0)).unwrap().unwrap();
        assert_eq!(entry.description, "standup and review");
        assert_eq!(entry.end_time, t(11, 0));
        assert_eq!(entry.mood, Some(Mood::Focused));
        assert_eq!(entry.tags, vec![ActivityTag::Work, ActivityTag::SelfCare]);
    }

    #[test]
    fn log_updates_existing_slot() {
        let mut db = Database::open_in_memory().unwrap();
        log(
            &mut db,
            &LogArgs {
                note: Some("first".to_string()),
                ..args("07:00")
            },
        )
        .unwrap();
        let output = log(
            &mut db,
            &LogArgs {
                note: Some("second".to_string()),
                date: Some("today".to_string()),
                ..args("07:00")
            },
        )
        .unwrap();

        assert!(output.starts_with("Updated entry 1"));
        assert_eq!(db.entries_for_date(monday()).unwrap().len(), 1);
    }

    #[test]
    fn log_uses_short_final_slot_end() {
        let mut db = Database::open_in_memory().unwrap();
        db.update_preferences(|prefs| UserPreferences {
            sleep_time: t(22, 30),
            ..prefs
        })
        .unwrap();

        log(
            &mut db,
            &LogArgs {
                note: Some("wind down".to_string()),
                date: Some("yesterday".to_string()),
                ..args("21:00")
            },
        )
        .unwrap();

        let sunday = monday().pred_opt().unwrap();
        let entry = db.entry_by_slot(sunday, t(21, 0)).unwrap().unwrap();
        assert_eq!(entry.end_time, t(22, 30));
    }

    #[test]
    fn log_rejects_off_boundary_start() {
        let mut db = Database::open_in_memory().unwrap();
        let err = log(
            &mut db,
            &LogArgs {
                note: Some("x".to_string()),
                ..args("10:00")
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("10:00 AM is not a slot start"));
        assert!(err.to_string().contains("7:00 AM, 9:00 AM"));
    }

    #[test]
    fn log_rejects_empty_entry() {
        let mut db = Database::open_in_memory().unwrap();
        let err = log(
            &mut db,
            &LogArgs {
                note: Some("   ".to_string()),
                ..args("09:00")
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("provide --note"));
        assert!(db.entries_for_date(monday()).unwrap().is_empty());
    }

    #[test]
    fn log_rejects_unknown_mood() {
        let mut db = Database::open_in_memory().unwrap();
        let err = log(
            &mut db,
            &LogArgs {
                mood: Some("grumpy".to_string()),
                ..args("09:00")
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("grumpy"));
    }

    #[test]
    fn delete_removes_entry() {
        let mut db = Database::open_in_memory().unwrap();
        log(
            &mut db,
            &LogArgs {
                note: Some("x".to_string()),
                ..args("09:00")
            },
        )
        .unwrap();

        let mut output = Vec::new();
        delete(&mut output, &mut db, 1).unwrap();
        assert_snapshot!(String::from_utf8(output).unwrap(), @"Deleted entry 1");

        let err = delete(&mut Vec::new(), &mut db, 1).unwrap_err();
        assert!(err.to_string().contains("entry not found: 1"));
    }
}
