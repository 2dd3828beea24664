//! Day command: the slot grid for one date with its entries.

use std::io::Write;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tj_core::time::{format_time, format_time_range};
use tj_core::{DaySummary, JournalEntry, TimeSlot};
use tj_db::Database;

use super::util::{percent, tag_list};

#[derive(Debug, Serialize)]
struct DayView<'a> {
    date: NaiveDate,
    summary: DaySummary,
    active_slot: Option<usize>,
    next_check_in: Option<NaiveTime>,
    slots: Vec<SlotView<'a>>,
}

#[derive(Debug, Serialize)]
struct SlotView<'a> {
    index: usize,
    start_time: NaiveTime,
    end_time: NaiveTime,
    active: bool,
    entry: Option<&'a JournalEntry>,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    date: NaiveDate,
    now: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let prefs = db.load_preferences()?;
    let schedule = prefs.schedule();
    let entries = db.entries_for_date(date)?;
    let slots = schedule.generate_slots(&entries);

    let is_today = date == now.date();
    let active_slot = if is_today {
        schedule.active_slot(now.time()).index_within(slots.len())
    } else {
        None
    };
    let next_check_in = if is_today {
        schedule.next_boundary(now.time())
    } else {
        None
    };
    tracing::debug!(%date, slots = slots.len(), entries = entries.len(), ?active_slot, "day view");

    let view = DayView {
        date,
        summary: DaySummary::from_slots(date, &slots),
        active_slot,
        next_check_in,
        slots: slot_views(&slots, active_slot),
    };

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&view)?)?;
        return Ok(());
    }

    write_text(writer, &view, is_today)
}

fn slot_views<'a>(slots: &[TimeSlot<'a, JournalEntry>], active: Option<usize>) -> Vec<SlotView<'a>> {
    slots
        .iter()
        .enumerate()
        .map(|(index, slot)| SlotView {
            index,
            start_time: slot.start_time,
            end_time: slot.end_time,
            active: active == Some(index),
            entry: slot.entry,
        })
        .collect()
}

fn write_text<W: Write>(writer: &mut W, view: &DayView<'_>, is_today: bool) -> Result<()> {
    let summary = &view.summary;
    writeln!(writer, "{}", view.date.format("%A, %B %-d, %Y"))?;

    if view.slots.is_empty() {
        writeln!(
            writer,
            "No slots: wake time must be before sleep time and the interval positive."
        )?;
        return Ok(());
    }

    writeln!(
        writer,
        "Filled {} of {} slots ({}%)",
        summary.filled_slots,
        summary.total_slots,
        percent(summary.filled_slots, summary.total_slots)
    )?;
    if let Some(mood) = summary.dominant_mood {
        writeln!(writer, "Mood: {mood}")?;
    }
    if !summary.top_tags.is_empty() {
        writeln!(writer, "Tags: {}", tag_list(&summary.top_tags))?;
    }

    writeln!(writer)?;
    for slot in &view.slots {
        let marker = if slot.active { '>' } else { ' ' };
        let range = format_time_range(slot.start_time, slot.end_time);
        let content = slot.entry.map_or_else(|| "-".to_string(), describe_entry);
        writeln!(writer, "{marker} {range:<20}{content}")?;
    }

    if is_today {
        writeln!(writer)?;
        match view.next_check_in {
            Some(next) => writeln!(writer, "Next check-in: {}", format_time(next))?,
            None => writeln!(writer, "No more check-ins today.")?,
        }
    }

    Ok(())
}

/// One-line rendering of an entry: note, mood and tags separated by `|`.
pub(crate) fn describe_entry(entry: &JournalEntry) -> String {
    let mut parts = Vec::new();
    if !entry.description.is_empty() {
        parts.push(entry.description.clone());
    }
    if let Some(mood) = entry.mood {
        parts.push(mood.to_string());
    }
    if !entry.tags.is_empty() {
        parts.push(tag_list(&entry.tags));
    }
    if parts.is_empty() {
        return "(empty)".to_string();
    }
    parts.join(" | ")
}
