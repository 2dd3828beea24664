//! Storage layer for the time journal.
//!
//! Provides persistence for journal entries, preferences and pending reminders
//! using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` can be moved between threads but not shared without external
//! synchronization. The CLI opens one per process.
//!
//! # Schema
//!
//! ## Temporal Columns
//!
//! Dates are stored as TEXT `YYYY-MM-DD`, times of day as `HH:MM:SS`, reminder
//! fire times as `YYYY-MM-DDTHH:MM:SS` (local, naive) and `created_at` as RFC 3339
//! UTC. All formats sort lexicographically in chronological order.
//!
//! ## Entry Payload
//!
//! `mood` holds the lowercase mood name or an empty string; `tags` holds
//! comma-separated tag labels. Unrecognized values are logged and dropped on
//! read so a row written by a newer version never blocks the day view.
//!
//! `(date, start_time)` is unique: one entry per slot per day.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;
use tj_core::time::parse_time_of_day;
use tj_core::{ActivityTag, JournalEntry, Mood, Reminder, ReminderSink, UserPreferences};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored date, time or timestamp could not be parsed.
    #[error("invalid {column} for entry {entry_id}: {value}")]
    InvalidColumn {
        entry_id: i64,
        column: &'static str,
        value: String,
    },
    /// A stored preference value could not be parsed.
    #[error("invalid preference {key}: {value}")]
    InvalidPreference { key: String, value: String },
    /// A stored reminder row could not be parsed.
    #[error("invalid reminder {key}: {value}")]
    InvalidReminder { key: u32, value: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Raw `journal_entries` row before parsing.
#[derive(Debug)]
struct EntryRow {
    id: i64,
    date: String,
    start_time: String,
    end_time: String,
    description: String,
    mood: String,
    tags: String,
    created_at: String,
}

const ENTRY_COLUMNS: &str =
    "id, date, start_time, end_time, description, mood, tags, created_at";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS journal_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                mood TEXT NOT NULL DEFAULT '',
                tags TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entries_date ON journal_entries(date);
            CREATE UNIQUE INDEX IF NOT EXISTS idx_entries_slot
                ON journal_entries(date, start_time);

            -- Single preferences record, one row per field
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Pending reminders keyed by slot offset (bounded by MAX_REMINDERS)
            CREATE TABLE IF NOT EXISTS reminders (
                key INTEGER PRIMARY KEY,
                date TEXT NOT NULL,
                slot_start TEXT NOT NULL,
                slot_end TEXT NOT NULL,
                fire_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_reminders_fire_at ON reminders(fire_at);
            ",
        )?;
        Ok(())
    }

    // ========== Journal Entries ==========

    /// Lists entries for one date ordered by start time.
    pub fn entries_for_date(&self, date: NaiveDate) -> Result<Vec<JournalEntry>, DbError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM journal_entries WHERE date = ? ORDER BY start_time ASC"
        );
        self.query_entries(&sql, params![format_date(date)])
    }

    /// Lists entries in an inclusive date range ordered by date then start time.
    pub fn entries_for_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<JournalEntry>, DbError> {
        if end < start {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM journal_entries
             WHERE date BETWEEN ? AND ?
             ORDER BY date ASC, start_time ASC"
        );
        self.query_entries(&sql, params![format_date(start), format_date(end)])
    }

    /// Counts entries in an inclusive date range.
    pub fn count_entries_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<usize, DbError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM journal_entries WHERE date BETWEEN ? AND ?",
            params![format_date(start), format_date(end)],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Fetches an entry by ID.
    pub fn entry_by_id(&self, id: i64) -> Result<Option<JournalEntry>, DbError> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM journal_entries WHERE id = ?");
        Ok(self.query_entries(&sql, params![id])?.into_iter().next())
    }

    /// Fetches the entry recorded for a slot, if any.
    pub fn entry_by_slot(
        &self,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<Option<JournalEntry>, DbError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM journal_entries WHERE date = ? AND start_time = ? LIMIT 1"
        );
        Ok(self
            .query_entries(&sql, params![format_date(date), format_time(start_time)])?
            .into_iter()
            .next())
    }

    /// Returns whether a slot already has an entry.
    pub fn slot_has_entry(&self, date: NaiveDate, start_time: NaiveTime) -> Result<bool, DbError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM journal_entries WHERE date = ? AND start_time = ?",
                params![format_date(date), format_time(start_time)],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Inserts an entry, or updates the one already recorded for its slot.
    ///
    /// The slot is identified by `(date, start_time)`; `entry.id` is ignored. An
    /// update keeps the row's original `created_at`. Returns the row ID.
    pub fn upsert_entry(&mut self, entry: &JournalEntry) -> Result<i64, DbError> {
        let id = self.conn.query_row(
            "
            INSERT INTO journal_entries
            (date, start_time, end_time, description, mood, tags, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(date, start_time) DO UPDATE SET
                end_time = excluded.end_time,
                description = excluded.description,
                mood = excluded.mood,
                tags = excluded.tags
            RETURNING id
            ",
            params![
                format_date(entry.date),
                format_time(entry.start_time),
                format_time(entry.end_time),
                entry.description,
                entry.mood.map_or("", Mood::as_str),
                format_tags(&entry.tags),
                format_timestamp(entry.created_at),
            ],
            |row| row.get(0),
        )?;
        tracing::debug!(id, date = %entry.date, start = %entry.start_time, "entry saved");
        Ok(id)
    }

    /// Deletes an entry by ID. Returns whether a row was removed.
    pub fn delete_entry(&mut self, id: i64) -> Result<bool, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM journal_entries WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }

    fn query_entries(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<JournalEntry>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, entry_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(parse_entry(row?)?);
        }
        Ok(entries)
    }

    // ========== Preferences ==========

    /// Loads preferences, falling back to defaults for unset fields.
    pub fn load_preferences(&self) -> Result<UserPreferences, DbError> {
        read_preferences(&self.conn)
    }

    /// Applies `transform` to the stored preferences atomically and saves the result.
    pub fn update_preferences<F>(&mut self, transform: F) -> Result<UserPreferences, DbError>
    where
        F: FnOnce(UserPreferences) -> UserPreferences,
    {
        let tx = self.conn.transaction()?;
        let updated = transform(read_preferences(&tx)?);
        {
            let mut stmt = tx.prepare(
                "INSERT INTO preferences (key, value) VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )?;
            stmt.execute(params![KEY_WAKE, format_time(updated.wake_time)])?;
            stmt.execute(params![KEY_SLEEP, format_time(updated.sleep_time)])?;
            stmt.execute(params![KEY_INTERVAL, updated.interval_minutes.to_string()])?;
            stmt.execute(params![
                KEY_NOTIFICATIONS,
                updated.notifications_enabled.to_string()
            ])?;
        }
        tx.commit()?;
        tracing::debug!(?updated, "preferences saved");
        Ok(updated)
    }

    // ========== Reminders ==========

    /// Lists pending reminders ordered by fire time.
    pub fn list_reminders(&self) -> Result<Vec<Reminder>, DbError> {
        self.query_reminders(
            "SELECT key, date, slot_start, slot_end, fire_at FROM reminders
             ORDER BY fire_at ASC, key ASC",
            params![],
        )
    }

    /// Lists reminders whose fire time is at or before `now`.
    pub fn due_reminders(&self, now: NaiveDateTime) -> Result<Vec<Reminder>, DbError> {
        self.query_reminders(
            "SELECT key, date, slot_start, slot_end, fire_at FROM reminders
             WHERE fire_at <= ?
             ORDER BY fire_at ASC, key ASC",
            params![now.format(DATETIME_FORMAT).to_string()],
        )
    }

    fn query_reminders(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Reminder>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        let mut reminders = Vec::new();
        for row in rows {
            let (key, date, slot_start, slot_end, fire_at) = row?;
            let invalid = |value: &str| DbError::InvalidReminder {
                key,
                value: value.to_string(),
            };
            reminders.push(Reminder {
                key,
                date: NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|_| invalid(&date))?,
                slot_start: parse_time_of_day(&slot_start).ok_or_else(|| invalid(&slot_start))?,
                slot_end: parse_time_of_day(&slot_end).ok_or_else(|| invalid(&slot_end))?,
                fire_at: NaiveDateTime::parse_from_str(&fire_at, DATETIME_FORMAT)
                    .map_err(|_| invalid(&fire_at))?,
            });
        }
        Ok(reminders)
    }
}

impl ReminderSink for Database {
    type Error = DbError;

    fn clear_reminder(&mut self, key: u32) -> Result<(), Self::Error> {
        self.conn
            .execute("DELETE FROM reminders WHERE key = ?", params![key])?;
        Ok(())
    }

    fn register_reminder(&mut self, reminder: &Reminder) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO reminders (key, date, slot_start, slot_end, fire_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                reminder.key,
                format_date(reminder.date),
                format_time(reminder.slot_start),
                format_time(reminder.slot_end),
                reminder.fire_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }
}

const KEY_WAKE: &str = "wake_time";
const KEY_SLEEP: &str = "sleep_time";
const KEY_INTERVAL: &str = "interval_minutes";
const KEY_NOTIFICATIONS: &str = "notifications_enabled";

fn read_preferences(conn: &Connection) -> Result<UserPreferences, DbError> {
    let mut prefs = UserPreferences::default();
    let mut stmt = conn.prepare("SELECT key, value FROM preferences")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    for row in rows {
        let (key, value) = row?;
        let invalid = || DbError::InvalidPreference {
            key: key.clone(),
            value: value.clone(),
        };
        match key.as_str() {
            KEY_WAKE => prefs.wake_time = parse_time_of_day(&value).ok_or_else(invalid)?,
            KEY_SLEEP => prefs.sleep_time = parse_time_of_day(&value).ok_or_else(invalid)?,
            KEY_INTERVAL => prefs.interval_minutes = value.parse().map_err(|_| invalid())?,
            KEY_NOTIFICATIONS => prefs.notifications_enabled = value.parse().map_err(|_| invalid())?,
            _ => tracing::warn!(%key, "ignoring unknown preference"),
        }
    }
    Ok(prefs)
}

fn entry_row(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        id: row.get(0)?,
        date: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        description: row.get(4)?,
        mood: row.get(5)?,
        tags: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn parse_entry(row: EntryRow) -> Result<JournalEntry, DbError> {
    let id = row.id;
    let invalid = |column: &'static str, value: &str| DbError::InvalidColumn {
        entry_id: id,
        column,
        value: value.to_string(),
    };

    let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
        .map_err(|_| invalid("date", &row.date))?;
    let start_time =
        parse_time_of_day(&row.start_time).ok_or_else(|| invalid("start_time", &row.start_time))?;
    let end_time =
        parse_time_of_day(&row.end_time).ok_or_else(|| invalid("end_time", &row.end_time))?;
    let created_at = parse_timestamp(&row.created_at)
        .ok_or_else(|| invalid("created_at", &row.created_at))?;

    Ok(JournalEntry {
        id,
        date,
        start_time,
        end_time,
        description: row.description,
        mood: parse_mood(&row.mood, id),
        tags: parse_tags(&row.tags, id),
        created_at,
    })
}

fn parse_mood(value: &str, entry_id: i64) -> Option<Mood> {
    if value.trim().is_empty() {
        return None;
    }
    match value.parse() {
        Ok(mood) => Some(mood),
        Err(err) => {
            tracing::warn!(entry_id, %err, "dropping unrecognized mood");
            None
        }
    }
}

fn parse_tags(value: &str, entry_id: i64) -> Vec<ActivityTag> {
    value
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .filter_map(|label| match label.parse() {
            Ok(tag) => Some(tag),
            Err(err) => {
                tracing::warn!(entry_id, %err, "dropping unrecognized tag");
                None
            }
        })
        .collect()
}

fn format_tags(tags: &[ActivityTag]) -> String {
    tags.iter()
        .map(|tag| tag.label())
        .collect::<Vec<_>>()
        .join(",")
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
